use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    merge::{MergeError, MergeOptions, TopKMerge},
    source::WeightedSource,
    store::keyspace::Keyspace,
};

/// A union-top query: the keys to merge, their optional weights and the
/// merge options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionTopRequest {
    pub keys: Vec<String>,
    /// One weight per key when present. Missing weights default to 1.0.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: MergeOptions,
}

impl UnionTopRequest {
    pub fn new(keys: Vec<String>, options: MergeOptions) -> Self {
        Self {
            keys,
            weights: None,
            options,
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// The weight for every key, in key order.
    fn resolve_weights(&self) -> Result<Vec<f64>, MergeError> {
        let Some(weights) = &self.weights else {
            return Ok(vec![1.0; self.keys.len()]);
        };
        if weights.len() != self.keys.len() {
            return Err(MergeError::WeightCountMismatch {
                expected: self.keys.len(),
                actual: weights.len(),
            });
        }
        if let Some(weight) = weights.iter().find(|weight| !weight.is_finite()) {
            return Err(MergeError::InvalidWeight(weight.to_string()));
        }
        Ok(weights.clone())
    }
}

/// One slot of a flat union-top reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Element(String),
    Score(f64),
}

/// Merges the sorted sets named by `request` and returns the top `k` members
/// as a flat reply: each element, followed by its weighted score when scores
/// were requested.
///
/// Options and weights are checked before any key is looked at, and every key
/// is resolved before any member is read, so a type mismatch never leaves a
/// partial reply. A read failure part way through discards what was gathered.
pub fn zunion_top(keyspace: &Keyspace, request: &UnionTopRequest) -> Result<Vec<Reply>, MergeError> {
    request.options.validate()?;
    let weights = request.resolve_weights()?;
    let direction = request.options.direction;

    let mut sources = Vec::with_capacity(request.keys.len());
    for (key, weight) in request.keys.iter().zip(weights) {
        // the weight stays with its key even when an earlier key is empty
        if let Some(cursor) = keyspace.open_sorted_set(key, direction.for_weight(weight))? {
            sources.push(WeightedSource::with_weight(cursor, weight));
        }
    }
    debug!(
        keys = request.keys.len(),
        non_empty = sources.len(),
        "resolved union-top sources"
    );

    let per_result = if request.options.with_scores { 2 } else { 1 };
    let mut reply = Vec::with_capacity(request.options.k.min(64) * per_result);
    for ranked in TopKMerge::new(sources, request.options)? {
        let ranked = ranked?;
        reply.push(Reply::Element(ranked.element));
        if let Some(score) = ranked.score {
            reply.push(Reply::Score(score));
        }
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        merge::{Direction, TieBreak},
        store::keyspace::Value,
    };

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn element(name: &str) -> Reply {
        Reply::Element(name.to_string())
    }

    fn sample_keyspace() -> Keyspace {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("a", [("x", 5.0), ("y", 3.0)]).unwrap();
        keyspace.zadd("b", [("z", 4.0)]).unwrap();
        keyspace
    }

    #[test]
    fn test_forward_with_scores() {
        let keyspace = sample_keyspace();
        let request = UnionTopRequest::new(keys(&["a", "b"]), MergeOptions::new(2).with_scores(true));

        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(
            reply,
            vec![element("x"), Reply::Score(5.0), element("z"), Reply::Score(4.0)]
        );
    }

    #[test]
    fn test_reverse_without_scores() {
        let keyspace = sample_keyspace();
        let options = MergeOptions::new(2).direction(Direction::Reverse);
        let request = UnionTopRequest::new(keys(&["a", "b"]), options);

        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(reply, vec![element("y"), element("z")]);
    }

    #[test]
    fn test_missing_keys_keep_their_weights_aligned() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("b", [("p", 1.0)]).unwrap();
        keyspace.zadd("c", [("q", 3.0)]).unwrap();

        // "a" does not exist; "b" must still get weight 10
        let request = UnionTopRequest::new(
            keys(&["a", "b", "c"]),
            MergeOptions::new(2).with_scores(true),
        )
        .with_weights(vec![100.0, 10.0, 1.0]);

        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(
            reply,
            vec![element("p"), Reply::Score(10.0), element("q"), Reply::Score(3.0)]
        );
    }

    #[test]
    fn test_member_in_several_sets_is_returned_once() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("a", [("shared", 9.0), ("only_a", 1.0)]).unwrap();
        keyspace.zadd("b", [("shared", 8.0), ("only_b", 2.0)]).unwrap();

        let request = UnionTopRequest::new(keys(&["a", "b"]), MergeOptions::new(3));
        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(reply, vec![element("shared"), element("only_b"), element("only_a")]);

        let request = UnionTopRequest::new(keys(&["a", "b"]), MergeOptions::new(3).dedup(false));
        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(reply, vec![element("shared"), element("shared"), element("only_b")]);
    }

    #[test]
    fn test_wrong_type_aborts_without_reply() {
        let mut keyspace = sample_keyspace();
        keyspace.set("s", Value::String("not a set".to_string()));

        let request = UnionTopRequest::new(keys(&["a", "s", "b"]), MergeOptions::new(5));
        assert!(matches!(
            zunion_top(&keyspace, &request),
            Err(MergeError::WrongType { .. })
        ));
    }

    #[test]
    fn test_invalid_configuration() {
        let keyspace = sample_keyspace();

        let request = UnionTopRequest::new(keys(&["a"]), MergeOptions::new(0));
        assert!(matches!(
            zunion_top(&keyspace, &request),
            Err(MergeError::InvalidK(_))
        ));

        let request =
            UnionTopRequest::new(keys(&["a", "b"]), MergeOptions::new(1)).with_weights(vec![1.0]);
        assert!(matches!(
            zunion_top(&keyspace, &request),
            Err(MergeError::WeightCountMismatch {
                expected: 2,
                actual: 1
            })
        ));

        let request = UnionTopRequest::new(keys(&["a"]), MergeOptions::new(1))
            .with_weights(vec![f64::NAN]);
        assert!(matches!(
            zunion_top(&keyspace, &request),
            Err(MergeError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_invalid_configuration_reported_before_type_check() {
        let mut keyspace = Keyspace::new();
        keyspace.set("s", Value::String("oops".to_string()));

        let request = UnionTopRequest::new(keys(&["s"]), MergeOptions::new(0));
        assert!(matches!(
            zunion_top(&keyspace, &request),
            Err(MergeError::InvalidK(_))
        ));
    }

    #[test]
    fn test_no_keys_or_only_empty_keys() {
        let keyspace = Keyspace::new();
        let request = UnionTopRequest::new(Vec::new(), MergeOptions::new(3));
        assert!(zunion_top(&keyspace, &request).unwrap().is_empty());

        let request = UnionTopRequest::new(keys(&["nope", "nada"]), MergeOptions::new(3));
        assert!(zunion_top(&keyspace, &request).unwrap().is_empty());
    }

    #[test]
    fn test_weighted_tie_with_source_order() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("a", [("x", 10.0)]).unwrap();
        keyspace.zadd("b", [("y", 1.0)]).unwrap();

        let options = MergeOptions::new(2)
            .with_scores(true)
            .tie_break(TieBreak::SourceOrder);
        let request = UnionTopRequest::new(keys(&["b", "a"]), options).with_weights(vec![1.0, 0.1]);

        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(
            reply,
            vec![element("y"), Reply::Score(1.0), element("x"), Reply::Score(1.0)]
        );
    }

    fn weighted_scores(reply: &[Reply]) -> Vec<f64> {
        reply
            .iter()
            .filter_map(|slot| match slot {
                Reply::Score(score) => Some(*score),
                Reply::Element(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_negative_weight_forward() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("a", [("a1", 1.0), ("a2", 5.0), ("a3", 10.0)]).unwrap();
        keyspace.zadd("b", [("b1", 0.0)]).unwrap();

        let request = UnionTopRequest::new(keys(&["a", "b"]), MergeOptions::new(4).with_scores(true))
            .with_weights(vec![-1.0, 1.0]);

        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(
            reply,
            vec![
                element("b1"),
                Reply::Score(0.0),
                element("a1"),
                Reply::Score(-1.0),
                element("a2"),
                Reply::Score(-5.0),
                element("a3"),
                Reply::Score(-10.0),
            ]
        );
    }

    #[test]
    fn test_negative_weight_reverse() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("a", [("a1", 1.0), ("a2", 5.0), ("a3", 10.0)]).unwrap();
        keyspace.zadd("b", [("b1", -3.0), ("b2", 2.0)]).unwrap();

        let options = MergeOptions::new(5)
            .direction(Direction::Reverse)
            .with_scores(true);
        let request = UnionTopRequest::new(keys(&["a", "b"]), options).with_weights(vec![-1.0, 1.0]);

        let reply = zunion_top(&keyspace, &request).unwrap();
        assert_eq!(weighted_scores(&reply), vec![-10.0, -5.0, -3.0, -1.0, 2.0]);
        assert_eq!(reply[0], element("a3"));
    }

    #[test]
    fn test_mixed_sign_weights_stay_sorted() {
        let mut keyspace = Keyspace::new();
        keyspace.zadd("a", [("a1", -4.0), ("a2", 1.0), ("a3", 7.0)]).unwrap();
        keyspace.zadd("b", [("b1", -2.0), ("b2", 0.5), ("b3", 6.0)]).unwrap();
        keyspace.zadd("c", [("c1", 3.0), ("c2", 9.0)]).unwrap();

        for direction in [Direction::Forward, Direction::Reverse] {
            let options = MergeOptions::new(8).direction(direction).with_scores(true);
            let request = UnionTopRequest::new(keys(&["a", "b", "c"]), options)
                .with_weights(vec![-0.5, 2.0, -1.0]);

            let scores = weighted_scores(&zunion_top(&keyspace, &request).unwrap());
            assert_eq!(scores.len(), 8);
            for pair in scores.windows(2) {
                match direction {
                    Direction::Forward => assert!(pair[0] >= pair[1], "{:?}", scores),
                    Direction::Reverse => assert!(pair[0] <= pair[1], "{:?}", scores),
                }
            }
        }
    }

    #[test]
    fn test_request_from_json() {
        let request: UnionTopRequest = serde_json::from_str(
            r#"{"keys": ["a", "b"], "weights": [2.0, 0.5], "options": {"k": 1, "with_scores": true}}"#,
        )
        .unwrap();
        assert_eq!(request.options.k, 1);

        let reply = zunion_top(&sample_keyspace(), &request).unwrap();
        assert_eq!(reply, vec![element("x"), Reply::Score(10.0)]);
    }
}
