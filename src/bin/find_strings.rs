//! Line-oriented front end for the substring index.
//!
//! Input: a word count, that many words, a query count, that many queries,
//! one item per line. Output: one answer per query, one per line.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use substring_index::{build, SubstringIndex, OUT_OF_RANGE};

#[derive(Debug, Parser)]
#[command(version, about = "Print the k-th smallest distinct substring of a word list")]
struct Args {
    /// Read input from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write answers to this file instead of stdout
    #[arg(short, long, env = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Treat queries as 0-based ranks instead of 1-based positions
    #[arg(long)]
    zero_based: bool,
}

#[derive(Debug, PartialEq)]
struct Problem {
    words: Vec<String>,
    queries: Vec<u64>,
}

fn next_line<'a>(lines: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str> {
    lines
        .next()
        .with_context(|| format!("input ended before {}", what))
}

fn next_number<'a>(lines: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<u64> {
    let line = next_line(lines, what)?;
    line.trim()
        .parse()
        .with_context(|| format!("{} is not a number: {:?}", what, line))
}

fn parse(text: &str) -> Result<Problem> {
    let mut lines = text.lines();

    let word_count = next_number(&mut lines, "the word count")?;
    let words = (1..=word_count)
        .map(|i| next_line(&mut lines, &format!("word {}", i)).map(|w| w.trim().to_string()))
        .collect::<Result<Vec<_>>>()?;

    let query_count = next_number(&mut lines, "the query count")?;
    let queries = (1..=query_count)
        .map(|i| next_number(&mut lines, &format!("query {}", i)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Problem { words, queries })
}

fn answers<'a>(index: &'a SubstringIndex, queries: &[u64], zero_based: bool) -> Vec<&'a str> {
    queries
        .iter()
        .map(|&q| {
            let rank = if zero_based { Some(q) } else { q.checked_sub(1) };
            rank.and_then(|r| usize::try_from(r).ok())
                .map_or(OUT_OF_RANGE, |r| index.answer(r))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };

    let problem = parse(&text)?;
    info!(
        "read {} words and {} queries",
        problem.words.len(),
        problem.queries.len()
    );

    let index = build(&problem.words).context("failed to index words")?;
    info!("indexed {} distinct substrings", index.len());

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);
    for answer in answers(&index, &problem.queries, args.zero_based) {
        writeln!(out, "{}", answer)?;
    }
    out.flush().context("failed to write answers")?;

    Ok(())
}
