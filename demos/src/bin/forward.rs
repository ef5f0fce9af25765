use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use decoder_rs::model::{ForwardPipeline, ModelConfig};
use decoder_rs::nn::Mode;
use decoder_rs::random::StdRandom;
use decoder_rs::tokenizer::{string_to_tokens, tokens_to_string};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prompt used when `--text` is not given.
const DEFAULT_TEXT: &str = "สวัสดี! มีอะไรให้ฉันช่วยไหม?";

#[derive(Parser, Debug)]
#[command(author, version, about = "Run one decoder forward pass over random weights", long_about = None)]
struct Args {
    /// Input text; every character becomes one token.
    #[arg(short, long, default_value = DEFAULT_TEXT)]
    text: String,

    /// JSON model config. Defaults to the built-in reference model.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for weights and dropout. Omit for a fresh model every run.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Disable dropout.
    #[arg(long)]
    eval: bool,

    /// Number of most likely tokens to print per position.
    #[arg(short = 'k', long, default_value_t = 3)]
    top_k: usize,

    /// Print the full probability matrix as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<ModelConfig> {
    let Some(path) = path else {
        return Ok(ModelConfig::reference());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ModelConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

fn top_k(row: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);
    ranked
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let mode = if args.eval { Mode::Eval } else { Mode::Train };
    let mut rng = match args.seed {
        Some(seed) => StdRandom::seeded(seed),
        None => StdRandom::from_entropy(),
    };

    let tokens = string_to_tokens(&args.text);
    info!(?config, tokens = tokens.len(), ?mode, "starting forward pass");

    let pipeline =
        ForwardPipeline::<f32>::random(&config, &mut rng).context("invalid model config")?;
    let probs = pipeline
        .forward(&tokens, mode, &mut rng)
        .context("forward pass failed")?;

    if args.json {
        let out = json!({
            "config": config,
            "mode": mode,
            "tokens": &tokens[..probs.rows()],
            "probabilities": probs.to_rows(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} positions x {} vocabulary entries ({} parameters)",
        probs.rows(),
        probs.cols(),
        config.num_parameters()
    );
    for (pos, row) in probs.iter_rows().enumerate() {
        let input = tokens_to_string(&tokens[pos..=pos]);
        let best: Vec<String> = top_k(row, args.top_k)
            .into_iter()
            .map(|(token, p)| format!("{token}:{p:.4}"))
            .collect();
        println!("{pos:>4} {input:?} -> {}", best.join(" "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["forward"]);
        assert_eq!(args.text, "สวัสดี! มีอะไรให้ฉันช่วยไหม?");
        assert_eq!(args.top_k, 3);
        assert!(args.config.is_none());
        assert!(!args.eval);
    }

    #[test]
    fn test_default_text_fits_reference_context() {
        // 28 code points, well under max_seq_length = 128.
        let tokens = string_to_tokens(DEFAULT_TEXT);
        assert_eq!(tokens.len(), 28);
        assert!(tokens.len() <= ModelConfig::reference().max_seq_length);
    }

    #[test]
    fn test_top_k_orders_by_probability() {
        let ranked = top_k(&[0.1, 0.6, 0.3], 2);
        assert_eq!(ranked, vec![(1, 0.6), (2, 0.3)]);
    }
}
