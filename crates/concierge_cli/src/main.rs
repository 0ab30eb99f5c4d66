use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use concierge_core::{
    calc_refund, create_free_coupon, evaluate_cases, load_snapshot, save_snapshot, Corpus, Coupon,
    EvalCase, FaqRetriever, IndexSnapshot, LexiconSentimentModel, Refund, RetrieverConfig, Router,
    SentimentModel, TfidfIndex, Tokenizer, DEFAULT_COUPON_VALIDITY_DAYS, DEFAULT_REFUND_PERCENT,
    DEFAULT_REQUIRED_PASS_RATE, DEFAULT_THRESHOLD, DEFAULT_TOP_K,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "concierge")]
#[command(about = "Offline hotel FAQ and restaurant review assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a TF-IDF index snapshot from a FAQ source file.
    BuildIndex {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Index stop words instead of stripping them.
        #[arg(long, default_value_t = false)]
        keep_stop_words: bool,
    },
    /// Answer a single guest question against a snapshot.
    Query {
        #[arg(long)]
        index: PathBuf,
        #[arg(long)]
        question: String,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f32,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Run retrieval eval cases against a snapshot.
    Eval {
        #[arg(long)]
        index: PathBuf,
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f32,
        #[arg(long, default_value_t = DEFAULT_REQUIRED_PASS_RATE)]
        min_pass_rate: f32,
    },
    /// Score a restaurant review and apply the reward policy.
    Review {
        #[arg(long)]
        text: String,
        /// Path to a sentiment lexicon artifact; defaults to the built-in.
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Order amount in dollars, used to compute a refund offer.
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long, default_value = "text")]
        output: String,
    },
    /// Auto-detect intent and answer a question or score a review.
    Ask {
        #[arg(long)]
        index: PathBuf,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f32,
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_eval_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file).context("parse eval cases json")?;
    Ok(cases)
}

fn make_sentiment_model(lexicon: &Option<PathBuf>) -> Result<LexiconSentimentModel> {
    match lexicon {
        Some(path) => {
            LexiconSentimentModel::load(path).context("load sentiment lexicon artifact")
        }
        None => Ok(LexiconSentimentModel::builtin()),
    }
}

fn load_retriever(index: &Path, threshold: f32, top_k: usize) -> Result<FaqRetriever> {
    let snapshot = load_snapshot(index)?;
    tracing::debug!(
        entries = snapshot.corpus.len(),
        built_at = %snapshot.built_at,
        "loaded index snapshot"
    );
    let config = RetrieverConfig { threshold, top_k };
    Ok(FaqRetriever::from_parts(
        snapshot.corpus,
        snapshot.index,
        config,
    ))
}

#[derive(Debug, serde::Serialize)]
struct ReviewReport<'a> {
    model: &'a str,
    label: String,
    confidence: f32,
    positivity: f32,
    action: concierge_core::ReviewAction,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon: Option<&'a Coupon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refund: Option<&'a Refund>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::BuildIndex {
            input,
            output,
            keep_stop_words,
        } => {
            let corpus = Corpus::load(input)?;
            let tokenizer = Tokenizer::new(!*keep_stop_words);
            let index = TfidfIndex::build(&corpus, tokenizer);
            let snapshot = IndexSnapshot::new(corpus, index);
            save_snapshot(output, &snapshot)?;

            println!(
                "entries={} vocab={} output={}",
                snapshot.corpus.len(),
                snapshot.index.vocab_size(),
                output.display()
            );
        }
        Commands::Query {
            index,
            question,
            threshold,
            top_k,
        } => {
            let retriever = load_retriever(index, *threshold, *top_k)?;
            let result = retriever.answer(question);

            println!(
                "decision={:?} score={:.4} question={}",
                result.decision,
                result.score,
                result.question.as_deref().unwrap_or("null")
            );
            println!("answer={}", result.answer_or_fallback());
            for candidate in &result.candidates {
                println!(
                    "candidate={} score={:.4}",
                    candidate.question, candidate.score
                );
            }
        }
        Commands::Eval {
            index,
            cases,
            threshold,
            min_pass_rate,
        } => {
            let retriever = load_retriever(index, *threshold, DEFAULT_TOP_K)?;
            let cases = read_eval_cases(cases)?;
            let summary = evaluate_cases(&retriever, &cases);

            let run_id = format!("eval-{}", chrono::Utc::now().timestamp_millis());
            println!(
                "run_id={} total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
                run_id,
                summary.total,
                summary.passed,
                summary.failed,
                summary.pass_rate,
                min_pass_rate,
                summary.meets(*min_pass_rate)
            );

            for outcome in &summary.outcomes {
                println!(
                    "case={} passed={} decision={:?} question={} score={:.4} latency={:.1}ms",
                    outcome.case_id,
                    outcome.passed,
                    outcome.actual_decision,
                    outcome.actual_question.as_deref().unwrap_or("null"),
                    outcome.score,
                    outcome.latency_ms
                );
            }

            let total_ms: f64 = summary.outcomes.iter().map(|o| o.latency_ms).sum();
            let avg_ms = total_ms / summary.outcomes.len().max(1) as f64;
            println!("total_latency={total_ms:.1}ms avg_latency={avg_ms:.1}ms");
        }
        Commands::Review {
            text,
            lexicon,
            amount,
            output,
        } => {
            let model = make_sentiment_model(lexicon)?;
            let prediction = model.predict(text)?;
            let positivity = concierge_core::positivity(&prediction);
            let decision = concierge_core::decide_action(prediction.label, positivity);

            let coupon = matches!(decision.action, concierge_core::ReviewAction::FreeCoupon)
                .then(|| create_free_coupon(DEFAULT_COUPON_VALIDITY_DAYS));
            let refund = match (decision.action, amount) {
                (concierge_core::ReviewAction::Refund15, Some(amount)) => {
                    Some(calc_refund(*amount, DEFAULT_REFUND_PERCENT))
                }
                _ => None,
            };

            match output.as_str() {
                "json" => {
                    let report = ReviewReport {
                        model: model.model_name(),
                        label: prediction.label.to_string(),
                        confidence: prediction.confidence,
                        positivity,
                        action: decision.action,
                        message: &decision.message,
                        coupon: coupon.as_ref(),
                        refund: refund.as_ref(),
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "text" => {
                    println!(
                        "model={} label={} confidence={:.4} positivity={:.4} action={:?}",
                        model.model_name(),
                        prediction.label,
                        prediction.confidence,
                        positivity,
                        decision.action
                    );
                    println!("message={}", decision.message);
                    if let Some(coupon) = &coupon {
                        println!(
                            "coupon={} expires={} percent_off={}",
                            coupon.code, coupon.expires, coupon.percent_off
                        );
                    }
                    if let Some(refund) = &refund {
                        println!(
                            "refund_amount={:.2} refund_percent={}",
                            refund.refund_amount, refund.refund_percent
                        );
                    }
                }
                other => anyhow::bail!("unknown output format: {other}"),
            }
        }
        Commands::Ask {
            index,
            text,
            threshold,
            lexicon,
        } => {
            let retriever = load_retriever(index, *threshold, DEFAULT_TOP_K)?;
            let model = make_sentiment_model(lexicon)?;
            let router = Router::new(retriever, model);
            let reply = router.handle(text)?;

            println!("kind={:?}", reply.kind);
            println!("{}", reply.text);
        }
    }

    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
