use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use vabamorf_rs::analyzer::{Analysis, AnalyseFlags, Origin};
use vabamorf_rs::errors::EngineError;
use vabamorf_rs::synth::SynthesiseRequest;
use vabamorf_rs::{morph::PartOfSpeech, MorphEngine};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyses every word in a JSON document, adding `words[].analysis[]`.
    Analyse {
        #[clap(long = "in")]
        input: PathBuf,
        #[clap(long = "out")]
        output: PathBuf,
        #[clap(long)]
        guess: bool,
        #[clap(long)]
        phonetic: bool,
        #[clap(long)]
        propername: bool,
    },
    /// Spell-checks every word, adding `words[].spelling` and suggestions.
    Spell {
        #[clap(long = "in")]
        input: PathBuf,
        #[clap(long = "out")]
        output: PathBuf,
        #[clap(long)]
        suggest: bool,
    },
    /// Synthesises surface forms for lemma + POS + form requests.
    Synthesise {
        #[clap(long = "in")]
        input: PathBuf,
        #[clap(long = "out")]
        output: PathBuf,
        #[clap(long)]
        guess: bool,
    },
    /// Reduces each word's `analysis[]` to the Viterbi-decoded reading(s).
    Disambiguate {
        #[clap(long = "in")]
        input: PathBuf,
        #[clap(long = "out")]
        output: PathBuf,
        #[clap(long = "model")]
        model: PathBuf,
    },
}

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the binary dictionary file.
    #[clap(long = "lex")]
    lex: PathBuf,

    /// Optional user dictionary overlay, consulted before `--lex`.
    #[clap(long = "userdict")]
    userdict: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnalysisJson {
    stem: String,
    ending: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    clitic: Option<String>,
    pos: String,
    form: String,
    origin: String,
}

impl AnalysisJson {
    fn from_analysis(a: &Analysis) -> Self {
        AnalysisJson {
            stem: a.stem.to_string(),
            ending: a.ending_string.clone(),
            clitic: a.clitic.clone(),
            pos: a.pos.to_string(),
            form: a.form.to_string(),
            origin: origin_name(a.origin).to_string(),
        }
    }
}

fn origin_name(origin: Origin) -> &'static str {
    match origin {
        Origin::Dictionary => "dictionary",
        Origin::UserDictionary => "user_dictionary",
        Origin::GuesserSuffix => "guesser_suffix",
        Origin::GuesserAnalogy => "guesser_analogy",
        Origin::GuesserCompound => "guesser_compound",
        Origin::Unknown => "unknown",
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WordJson {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis: Option<Vec<AnalysisJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spelling: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SentenceJson {
    words: Vec<WordJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ParagraphJson {
    sentences: Vec<SentenceJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    paragraphs: Vec<ParagraphJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SynthWordJson {
    lemma: String,
    partofspeech: String,
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    text: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SynthDocument {
    words: Vec<SynthWordJson>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &PathBuf) -> Result<T, EngineError> {
    let raw = fs::read_to_string(path).map_err(|error| EngineError::File {
        file: path.clone(),
        error,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> Result<(), EngineError> {
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).map_err(|error| EngineError::File {
        file: path.clone(),
        error,
    })?;
    Ok(())
}

fn run() -> Result<(), EngineError> {
    let args = Args::parse();
    let mut engine = MorphEngine::open_mmap(&args.lex)?;
    if let Some(userdict) = &args.userdict {
        engine.load_user_dictionary(userdict)?;
    }

    match args.command {
        Commands::Analyse {
            input,
            output,
            guess,
            phonetic,
            propername,
        } => {
            let mut doc: Document = read_json(&input)?;
            let flags = AnalyseFlags {
                guess,
                hyphenation: false,
                phonetic,
                propername,
            };
            for paragraph in &mut doc.paragraphs {
                for sentence in &mut paragraph.sentences {
                    for word in &mut sentence.words {
                        let set = engine.analyse(&word.text, flags)?;
                        word.analysis =
                            Some(set.0.iter().map(AnalysisJson::from_analysis).collect());
                    }
                }
            }
            write_json(&output, &doc)?;
        }
        Commands::Spell {
            input,
            output,
            suggest,
        } => {
            let mut doc: Document = read_json(&input)?;
            for paragraph in &mut doc.paragraphs {
                for sentence in &mut paragraph.sentences {
                    for word in &mut sentence.words {
                        let result = engine.spell_check(&word.text, suggest)?;
                        word.spelling = Some(result.correct);
                        word.suggestions = result.suggestions;
                    }
                }
            }
            write_json(&output, &doc)?;
        }
        Commands::Synthesise {
            input,
            output,
            guess,
        } => {
            let mut doc: SynthDocument = read_json(&input)?;
            for word in &mut doc.words {
                let pos = PartOfSpeech::from_char(word.partofspeech.chars().next().unwrap_or(' '))
                    .ok_or_else(|| {
                        EngineError::UnknownCommand(format!(
                            "unknown part of speech '{}'",
                            word.partofspeech
                        ))
                    })?;
                let req = SynthesiseRequest {
                    lemma: &word.lemma,
                    pos,
                    form_set: &word.form,
                    clitic: None,
                    paradigm_example: word.hint.as_deref(),
                    guess,
                    phonetic: false,
                };
                word.text = engine.synthesise(&req)?;
            }
            write_json(&output, &doc)?;
        }
        Commands::Disambiguate {
            input,
            output,
            model,
        } => {
            engine.load_model(&model)?;
            let mut doc: Document = read_json(&input)?;
            for paragraph in &mut doc.paragraphs {
                for sentence in &mut paragraph.sentences {
                    // Re-analyse to get `Analysis` values the disambiguator
                    // can score, then write the reduced set back as JSON.
                    let mut words: Vec<(String, vabamorf_rs::AnalysisSet)> = Vec::new();
                    for word in sentence.words.iter() {
                        let set = engine.analyse(&word.text, AnalyseFlags::default())?;
                        words.push((word.text.clone(), set));
                    }
                    engine.disambiguate_sentence(&mut words);
                    for (word, (_, set)) in sentence.words.iter_mut().zip(words.into_iter()) {
                        word.analysis =
                            Some(set.0.iter().map(AnalysisJson::from_analysis).collect());
                    }
                }
            }
            write_json(&output, &doc)?;
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
    debug!("done");
}
