//! GridText CLI — identity, resolution, and SMPC selection from the shell
//!
//! Commands:
//!   gridtext hash     — hash a string to its identity key
//!   gridtext code     — wire code for a type name
//!   gridtext query    — build a canonical resource query
//!   gridtext resolve  — resolve a query against a demo grid + the disk cache
//!   gridtext select   — pick SMPC participants from a demo peer set
//!   gridtext demo     — run the full walkthrough

use gridtext_core::network::{select_participants, InMemoryNetwork, ResolverConfig};
use gridtext_core::{
    hash_string, type_code, PeerNetwork, Resolved, ResolveError, ResourceQuery, State, StateCache,
    TieredResolver,
};
use std::env;
use std::time::Duration;

fn print_usage() {
    println!(
        r#"
GridText — shared pipeline state on a peer grid

Usage: gridtext <command> [options]

Commands:
  hash    <text>                 Identity key of a string
  code    <type-name>            Wire code for a serializable type
  query   <namespace> <name>     Canonical query and its cache location
  resolve <namespace> <name>     Resolve against a demo grid + disk cache
  select  [n-peers]              SMPC participant selection (default 4 peers)
  demo                           Full walkthrough

Examples:
  gridtext hash token
  gridtext code VocabState
  gridtext query sentiment-en vocab
  gridtext resolve sentiment-en vocab
  gridtext select 2
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "hash" => cmd_hash(&args[2..]),
        "code" => cmd_code(&args[2..]),
        "query" => cmd_query(&args[2..]),
        "resolve" => cmd_resolve(&args[2..]),
        "select" => cmd_select(&args[2..]),
        "demo" => cmd_demo(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}

fn cmd_hash(args: &[String]) {
    let Some(text) = args.first() else {
        eprintln!("Usage: gridtext hash <text>");
        return;
    };
    let key = hash_string(text);
    println!("  {} -> {} (0x{:016x})", text, key, key);
}

fn cmd_code(args: &[String]) {
    let Some(type_name) = args.first() else {
        eprintln!("Usage: gridtext code <type-name>");
        return;
    };
    println!("  {} -> {}", type_name, type_code(type_name));
}

fn cmd_query(args: &[String]) {
    let [namespace, name] = args else {
        eprintln!("Usage: gridtext query <namespace> <name>");
        return;
    };
    match ResourceQuery::new(namespace, name) {
        Ok(query) => {
            let cache = StateCache::new(StateCache::default_root());
            println!("  query:      {}", query);
            println!("  cache key:  {}", query.cache_key());
            println!("  cache path: {}", cache.entry_path(&query).display());
        }
        Err(err) => eprintln!("  invalid query: {}", err),
    }
}

/// A small grid to resolve against: two remote peers, one of which hosts
/// the sentiment-en pipeline's states.
fn demo_grid() -> InMemoryNetwork {
    let mut grid = InMemoryNetwork::new("me");
    grid.add_peer("peer-berlin");
    let vocab = ResourceQuery::new("sentiment-en", "vocab").expect("static query");
    let tokenizer = ResourceQuery::new("sentiment-en", "tokenizer").expect("static query");
    grid.publish_at("peer-oslo", State::for_query(&vocab, b"demo vocab table".to_vec()));
    grid.publish_at(
        "peer-oslo",
        State::for_query(&tokenizer, b"demo tokenizer rules".to_vec()),
    );
    grid
}

fn cmd_resolve(args: &[String]) {
    let [namespace, name] = args else {
        eprintln!("Usage: gridtext resolve <namespace> <name>");
        return;
    };
    let query = match ResourceQuery::new(namespace, name) {
        Ok(query) => query,
        Err(err) => {
            eprintln!("  invalid query: {}", err);
            return;
        }
    };
    let config = ResolverConfig {
        cache_root: StateCache::default_root(),
        remote_timeout: Duration::from_secs(5),
    };
    let resolver = TieredResolver::with_config(demo_grid(), config);
    match resolver.resolve(&query) {
        Ok(Resolved::Local(state)) => {
            println!("  local object {} ({} bytes)", state.id, state.payload.len())
        }
        Ok(Resolved::Cached(state)) => {
            println!("  cached object {} ({} bytes)", state.id, state.payload.len())
        }
        Ok(Resolved::Remote { peer, query }) => {
            println!("  remote reference: `{}` on peer `{}`", query, peer)
        }
        Err(ResolveError::NotFound(query)) => println!("  `{}` is not on the grid", query),
        Err(err) => eprintln!("  resolution failed: {}", err),
    }
}

fn cmd_select(args: &[String]) {
    let peer_count: usize = args
        .first()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(4);
    let mut grid = InMemoryNetwork::new("me");
    for index in 0..peer_count {
        grid.add_peer(format!("peer-{}", index).as_str());
    }
    match select_participants(&grid, &grid.local_id()) {
        Some(config) => {
            for (role, peer) in config.roles() {
                println!("  {:16} {}", role, peer);
            }
            if config.is_degenerate() {
                println!("  (two-peer grid: crypto provider doubles as a share holder)");
            }
        }
        None => println!("  {} peer(s): not enough for secret sharing", peer_count),
    }
}

fn cmd_demo() {
    println!("== identity ==");
    for text in ["token", "sentiment-en:vocab"] {
        println!("  hash({}) = {}", text, hash_string(text));
    }
    println!("  code(VocabState) = {}", type_code("VocabState"));

    println!("== resolution ==");
    let grid = demo_grid();
    let resolver = TieredResolver::with_config(
        grid,
        ResolverConfig {
            cache_root: StateCache::default_root(),
            remote_timeout: Duration::from_secs(5),
        },
    );
    let vocab = ResourceQuery::new("sentiment-en", "vocab").expect("static query");
    match resolver.resolve(&vocab) {
        Ok(resolved) => println!("  {} -> {:?}", vocab, resolved),
        Err(err) => println!("  {} -> {}", vocab, err),
    }
    let missing = ResourceQuery::new("sentiment-en", "ner").expect("static query");
    match resolver.resolve(&missing) {
        Ok(resolved) => println!("  {} -> {:?}", missing, resolved),
        Err(err) => println!("  {} -> {}", missing, err),
    }

    println!("== smpc selection ==");
    cmd_select(&["4".to_string()]);
    cmd_select(&["2".to_string()]);
}
