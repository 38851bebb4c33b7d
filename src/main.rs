use std::{env, process};

use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zset_topk::{
    config::{load_config, load_dataset},
    store::{Reply, zunion_top},
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = load_config(&config_path);
    let options = &config.query.options;

    println!("\nCurrent Configuration:");
    println!("  Dataset:      {}", config.dataset_path);
    println!("  Keys:         {}", config.query.keys.join(" "));
    if let Some(weights) = &config.query.weights {
        println!("  Weights:      {:?}", weights);
    }
    println!("  K:            {}", options.k);
    println!("  Direction:    {:?}", options.direction);
    println!("  With scores:  {}", options.with_scores);
    println!("  Dedup:        {}", options.dedup);
    println!("  Tie break:    {:?}\n", options.tie_break);

    let keyspace = match load_dataset(&config.dataset_path) {
        Ok(keyspace) => {
            info!(path = %config.dataset_path, keys = keyspace.len(), "loaded dataset");
            keyspace
        }
        Err(e) => {
            error!(path = %config.dataset_path, error = %e, "could not load dataset");
            process::exit(1);
        }
    };

    let reply = match zunion_top(&keyspace, &config.query) {
        Ok(reply) => reply,
        Err(e) => {
            error!(error = %e, "union top failed");
            process::exit(1);
        }
    };

    let mut rank = 0;
    let mut slots = reply.into_iter().peekable();
    while let Some(slot) = slots.next() {
        let Reply::Element(element) = slot else {
            continue;
        };
        rank += 1;
        match slots.next_if(|next| matches!(next, Reply::Score(_))) {
            Some(Reply::Score(score)) => println!("{:>4}. {} score {}", rank, element, score),
            _ => println!("{:>4}. {}", rank, element),
        }
    }
    if rank == 0 {
        println!("(empty)");
    }
}
