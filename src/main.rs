//! bstmap - builds a tree map from the command line and reports its shape.
//!
//! Usage:
//!   bstmap [--avl] [--sorted] [--strings] [--remove KEY]... KEY...

use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context;
use bstmap::{Avl, Balance, Order, TreeMap, Unbalanced};
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bstmap")]
#[command(about = "Builds a binary search tree map from the given keys and reports its shape")]
struct Cli {
    /// Use the self-balancing AVL tree instead of a plain binary search tree
    #[arg(long)]
    avl: bool,

    /// Sort and de-duplicate the keys, then build a tree of minimal height in one step
    #[arg(long)]
    sorted: bool,

    /// Treat keys as strings even if they look like integers
    #[arg(long)]
    strings: bool,

    /// Key to remove once the map is built (repeatable)
    #[arg(long = "remove", value_name = "KEY")]
    remove: Vec<String>,

    /// Keys to insert; every key is also stored as its own value
    keys: Vec<String>,
}

#[derive(Debug, PartialEq, Eq, Error)]
enum ArgError {
    #[error("invalid integer '{token}' found at index {index}")]
    InvalidInteger { token: String, index: usize },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bstmap=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if use_int_keys(&cli) {
        let keys = parse_keys::<i64>(&cli.keys)?;
        let remove = parse_keys::<i64>(&cli.remove).context("invalid key to remove")?;
        run(&cli, keys, &remove)
    } else {
        run(&cli, cli.keys.clone(), &cli.remove)
    }
}

/// Keys are integers unless `--strings` is given or the first key is not one.
fn use_int_keys(cli: &Cli) -> bool {
    !cli.strings
        && cli
            .keys
            .first()
            .map_or(true, |first| first.parse::<i64>().is_ok())
}

fn parse_keys<K: FromStr>(tokens: &[String]) -> Result<Vec<K>, ArgError> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            token.parse().map_err(|_| ArgError::InvalidInteger {
                token: token.clone(),
                index,
            })
        })
        .collect()
}

fn run<K>(cli: &Cli, keys: Vec<K>, remove: &[K]) -> anyhow::Result<()>
where
    K: Ord + Clone + Display,
{
    if cli.avl {
        report(&build::<K, Avl>(cli.sorted, keys, remove)?);
    } else {
        report(&build::<K, Unbalanced>(cli.sorted, keys, remove)?);
    }
    Ok(())
}

fn build<K, B>(sorted: bool, mut keys: Vec<K>, remove: &[K]) -> anyhow::Result<TreeMap<K, K, B>>
where
    K: Ord + Clone,
    B: Balance,
{
    let mut map = if sorted {
        keys.sort();
        keys.dedup();
        TreeMap::from_sorted(keys.into_iter().map(|key| (key.clone(), key)))?
    } else {
        keys.into_iter().map(|key| (key.clone(), key)).collect()
    };
    for key in remove {
        if map.remove(key).is_none() {
            tracing::warn!("key to remove is not in the map");
        }
    }
    tracing::info!(len = map.len(), sorted, "map built");
    Ok(map)
}

fn report<K: Display, B>(map: &TreeMap<K, K, B>) {
    let stats = map.level_stats();
    println!("{}", map.to_ascii_drawing());
    println!("Height:                   {}", stats.height);
    println!("Total nodes:              {}", map.len());
    println!(
        "Successful search cost:   {:.3}",
        stats.successful_search_cost()
    );
    println!(
        "Unsuccessful search cost: {:.3}",
        stats.unsuccessful_search_cost()
    );
    for order in Order::ALL {
        let label = format!("{order} traversal:");
        println!("{label:<26}{}", map.traversal(order));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_key_mode() {
        assert!(use_int_keys(&Cli::parse_from(["bstmap", "5", "3", "8"])));
        assert!(use_int_keys(&Cli::parse_from(["bstmap"])));
        assert!(!use_int_keys(&Cli::parse_from(["bstmap", "pear", "1"])));
        assert!(!use_int_keys(&Cli::parse_from(["bstmap", "--strings", "5", "3"])));
        // Only the first key decides; later bad keys are parse errors.
        assert!(use_int_keys(&Cli::parse_from(["bstmap", "1", "x"])));
    }

    #[test]
    fn test_parse_keys_rejects_invalid_integer() {
        let err = parse_keys::<i64>(&tokens(&["1", "x"])).unwrap_err();
        assert_eq!(
            err,
            ArgError::InvalidInteger {
                token: "x".to_string(),
                index: 1,
            }
        );
        assert_eq!(err.to_string(), "invalid integer 'x' found at index 1");

        assert_eq!(parse_keys::<i64>(&tokens(&["-4", "0", "17"])), Ok(vec![-4, 0, 17]));
    }

    #[test]
    fn test_sorted_build_dedups() {
        let map = build::<i64, Avl>(true, vec![3, 1, 3, 2, 1], &[]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.height(), 1);
        assert_eq!(map.inorder(), "[1=1, 2=2, 3=3]");
        assert_eq!(map.preorder(), "[2=2, 1=1, 3=3]");
    }

    #[test]
    fn test_remove_missing_key_keeps_len() {
        let map = build::<i64, Avl>(false, vec![5, 3, 8], &[4, 9]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.inorder(), "[3=3, 5=5, 8=8]");

        let map = build::<String, Unbalanced>(false, tokens(&["b", "a", "c"]), &tokens(&["a", "z"]))
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.inorder(), "[b=b, c=c]");
    }
}
