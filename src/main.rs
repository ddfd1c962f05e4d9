use std::{env, process};

use symptom_recommender::{RecommendError, Recommender, Scheme};

// ---- simple CLI argument handling ----
// --corpus PATH      : corpus file, one comma-delimited record per line
// --scheme NAME      : binary (default) or tfidf
// --neighbors K      : neighbor count (default 5)
// --top N            : result count (default 5)
// --query "a, b, c"  : one-shot query; omitted -> interactive prompt
// e.g.  symptom-recommender --corpus data/symptom_data.csv --query "fever, cough"

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut corpus_path: Option<String> = None;
    let mut scheme = Scheme::Binary;
    let mut neighbors = 5usize;
    let mut top_n = 5usize;
    let mut query_opt: Option<String> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--corpus" => {
                if let Some(v) = args.next() { corpus_path = Some(v); } else { eprintln!("[error] --corpus requires a path"); process::exit(2); }
            }
            "--scheme" => {
                match args.next().as_deref() {
                    Some("binary") => scheme = Scheme::Binary,
                    Some("tfidf") => scheme = Scheme::tf_idf(),
                    Some(other) => { eprintln!("[error] unknown scheme: {}", other); process::exit(2); }
                    None => { eprintln!("[error] --scheme requires binary|tfidf"); process::exit(2); }
                }
            }
            "--neighbors" => {
                match args.next().and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) if n > 0 => neighbors = n,
                    _ => { eprintln!("[error] --neighbors needs a positive integer"); process::exit(2); }
                }
            }
            "--top" => {
                match args.next().and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) if n > 0 => top_n = n,
                    _ => { eprintln!("[error] --top needs a positive integer"); process::exit(2); }
                }
            }
            "--query" => {
                if let Some(v) = args.next() { query_opt = Some(v); } else { eprintln!("[error] --query requires a string"); process::exit(2); }
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other => {
                // first positional argument doubles as the query
                if query_opt.is_none() { query_opt = Some(other.to_string()); } else { eprintln!("[warn] extra arg ignored: {}", other); }
            }
        }
    }
    let Some(corpus_path) = corpus_path else {
        eprintln!("[error] --corpus is required");
        print_usage();
        process::exit(2);
    };

    let engine = match Recommender::from_corpus_file(&corpus_path, &scheme) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("[error] {}", e);
            process::exit(1);
        }
    };
    eprintln!(
        "[info] indexed {} records from {}",
        engine.indexed_records(),
        corpus_path
    );

    if let Some(qtext) = query_opt {
        run_single_query(&engine, &qtext, neighbors, top_n);
    } else {
        run_interactive(&engine, neighbors, top_n);
    }
}

fn print_usage() {
    eprintln!("Usage: symptom-recommender --corpus PATH [--scheme binary|tfidf] [--neighbors K] [--top N] [--query \"symptom, symptom\"]");
    eprintln!("Without a query argument, an interactive prompt is started. Output format: <support>\\t<symptom>");
}

fn split_query(text: &str) -> Vec<String> {
    text.split(',').map(|s| s.trim().to_string()).collect()
}

fn run_single_query(engine: &Recommender, query_text: &str, neighbors: usize, top_n: usize) {
    match engine.recommend(&split_query(query_text), neighbors, top_n) {
        Ok(rec) => {
            if rec.is_empty() {
                eprintln!("[info] no recommendations");
            }
            for (token, support) in &rec.entries {
                println!("{}\t{}", support, token);
            }
        }
        Err(RecommendError::EmptyQuery) => {
            eprintln!("[error] empty query");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("[error] {}", e);
            process::exit(1);
        }
    }
}

fn run_interactive(engine: &Recommender, neighbors: usize, top_n: usize) {
    use std::io::{self, Write};
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("Symptoms> ");
        let _ = stdout.flush();
        let mut line = String::new();
        if stdin.read_line(&mut line).is_err() { eprintln!("[error] read error"); break; }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            eprintln!("[info] bye");
            break;
        }
        match engine.recommend(&split_query(trimmed), neighbors, top_n) {
            Ok(rec) if rec.is_empty() => println!("(no recommendations)"),
            Ok(rec) => {
                for (token, support) in &rec.entries {
                    println!("{}\t{}", support, token);
                }
            }
            Err(e) => eprintln!("[error] {}", e),
        }
    }
}
