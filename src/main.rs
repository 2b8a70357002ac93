use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use placement_coach::config::AppConfig;
use placement_coach::error::AppError;
use placement_coach::telemetry;
use placement_coach::workflows::placement::import::{load_applications, load_corpus, load_profile};
use placement_coach::workflows::placement::{
    ChangeKey, ExplanationRequest, GapStatus, OpportunityEvaluation, PatternAnalysis,
    PlacementEngine, ReferenceSelection, SimulationChange, SimulationResult, SkillLevel,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "placement-coach",
    about = "Check placement eligibility, analyze rejections and simulate profile improvements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List eligibility and skill match for every opportunity in a corpus
    Eligibility(EligibilityArgs),
    /// Summarize recurring gaps across rejected applications
    Analyze(AnalyzeArgs),
    /// Project the effect of hypothetical profile changes across a corpus
    Simulate(SimulateArgs),
    /// Show the explanation-service payload for one application
    Explain(ExplainArgs),
}

#[derive(Args, Debug)]
struct EligibilityArgs {
    /// Profile JSON export
    #[arg(long)]
    profile: PathBuf,
    /// Opportunity corpus (.csv job-board export or JSON array)
    #[arg(long)]
    corpus: PathBuf,
    /// Emit JSON instead of a text listing
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Profile JSON export
    #[arg(long)]
    profile: PathBuf,
    /// Application history JSON array
    #[arg(long)]
    applications: PathBuf,
    /// Number of missing skills to surface (defaults to APP_TOP_MISSING_SKILLS)
    #[arg(long)]
    top: Option<usize>,
    /// Emit JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Profile JSON export
    #[arg(long)]
    profile: PathBuf,
    /// Opportunity corpus (.csv job-board export or JSON array)
    #[arg(long)]
    corpus: PathBuf,
    /// Change to simulate: `skill:NAME[:LEVEL]`, `cgpa:TARGET` or `cert:NAME`
    #[arg(long = "change", value_parser = parse_change)]
    changes: Vec<SimulationChange>,
    /// Effort override for a change, e.g. `skill:React=6` or `cgpa=10`
    #[arg(long = "effort", value_parser = parse_effort)]
    efforts: Vec<(ChangeKey, u32)>,
    /// Restrict match-score reporting to these employers (repeatable)
    #[arg(long = "reference-company")]
    reference_companies: Vec<String>,
    /// Emit JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// Profile JSON export
    #[arg(long)]
    profile: PathBuf,
    /// Application history JSON array
    #[arg(long)]
    applications: PathBuf,
    /// Application to explain
    #[arg(long)]
    application_id: String,
    /// Emit the request payload as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "placement coach starting");

    let mut engine_config = config.engine;
    if let Command::Analyze(AnalyzeArgs { top: Some(top), .. }) = &cli.command {
        engine_config.top_missing_skills = *top;
    }
    let engine = PlacementEngine::new(engine_config);

    match cli.command {
        Command::Eligibility(args) => run_eligibility(&engine, args),
        Command::Analyze(args) => run_analyze(&engine, args),
        Command::Simulate(args) => run_simulate(&engine, args),
        Command::Explain(args) => run_explain(&engine, args),
    }
}

fn parse_change(raw: &str) -> Result<SimulationChange, String> {
    let (kind, rest) = raw
        .split_once(':')
        .ok_or_else(|| format!("'{raw}' must look like kind:value"))?;

    match kind.trim().to_ascii_lowercase().as_str() {
        "skill" => {
            let (name, level) = match rest.rsplit_once(':') {
                Some((name, level)) => (
                    name,
                    SkillLevel::parse(level).map_err(|err| err.to_string())?,
                ),
                None => (rest, SkillLevel::Intermediate),
            };
            Ok(SimulationChange::Skill {
                name: name.trim().to_string(),
                level,
            })
        }
        "cgpa" => rest
            .trim()
            .parse::<f64>()
            .map(|target| SimulationChange::Cgpa { target })
            .map_err(|err| format!("'{rest}' is not a CGPA target ({err})")),
        "cert" | "certification" => Ok(SimulationChange::Certification {
            name: rest.trim().to_string(),
        }),
        other => Err(format!("unknown change kind '{other}'")),
    }
}

fn parse_effort(raw: &str) -> Result<(ChangeKey, u32), String> {
    let (target, effort) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("'{raw}' must look like change=effort"))?;
    let effort = effort
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("'{effort}' is not a whole effort estimate ({err})"))?;

    let key = if target.trim().eq_ignore_ascii_case("cgpa") {
        SimulationChange::Cgpa { target: 0.0 }.key()
    } else {
        let (kind, name) = target
            .split_once(':')
            .ok_or_else(|| format!("'{target}' must name a change such as skill:React"))?;
        let change = match kind.trim().to_ascii_lowercase().as_str() {
            "skill" => SimulationChange::Skill {
                name: name.to_string(),
                level: SkillLevel::Beginner,
            },
            "cert" | "certification" => SimulationChange::Certification {
                name: name.to_string(),
            },
            other => return Err(format!("unknown change kind '{other}'")),
        };
        change.key()
    };

    Ok((key, effort))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_eligibility(engine: &PlacementEngine, args: EligibilityArgs) -> Result<(), AppError> {
    let profile = load_profile(&args.profile)?;
    let corpus = load_corpus(&args.corpus)?;
    let evaluations = engine.evaluate(&profile, &corpus);

    if args.json {
        return print_json(&evaluations);
    }

    render_eligibility(&profile.name, profile.cgpa, &evaluations);
    Ok(())
}

fn run_analyze(engine: &PlacementEngine, args: AnalyzeArgs) -> Result<(), AppError> {
    let profile = load_profile(&args.profile)?;
    let applications = load_applications(&args.applications)?;
    let analysis = engine.analyze_rejections(&profile, &applications);

    if args.json {
        let surfaced = PatternAnalysis {
            common_missing_skills: engine.top_missing_skills(&analysis).to_vec(),
            ..analysis
        };
        return print_json(&surfaced);
    }

    render_analysis(engine, &analysis);
    Ok(())
}

fn run_simulate(engine: &PlacementEngine, args: SimulateArgs) -> Result<(), AppError> {
    let profile = load_profile(&args.profile)?;
    let corpus = load_corpus(&args.corpus)?;

    let mut options = engine.simulation_options();
    if !args.reference_companies.is_empty() {
        options = options.with_reference(ReferenceSelection::companies(&args.reference_companies));
    }
    options.effort_overrides.extend(args.efforts);

    let result = engine.simulate_with(&profile, &args.changes, &corpus, &options)?;

    if args.json {
        return print_json(&result);
    }

    render_simulation(&result);
    Ok(())
}

fn run_explain(engine: &PlacementEngine, args: ExplainArgs) -> Result<(), AppError> {
    let profile = load_profile(&args.profile)?;
    let applications = load_applications(&args.applications)?;
    let application = applications
        .iter()
        .find(|application| application.id.0 == args.application_id)
        .ok_or_else(|| AppError::Usage(format!("no application with id '{}'", args.application_id)))?;

    let request = engine.explanation_request(&profile, application);

    if args.json {
        return print_json(&request);
    }

    render_explanation(&args.application_id, &request);
    Ok(())
}

fn render_eligibility(name: &str, cgpa: f64, evaluations: &[OpportunityEvaluation]) {
    println!("Eligibility for {} (CGPA {:.2})", name, cgpa);

    let eligible = evaluations.iter().filter(|entry| entry.eligible).count();
    println!("Eligible for {} of {} opportunities\n", eligible, evaluations.len());

    for entry in evaluations {
        let verdict = if entry.eligible {
            "eligible".to_string()
        } else if let Some(shortfall) = entry.cgpa_shortfall {
            format!("not eligible (CGPA short by {:.2})", shortfall)
        } else {
            format!("not eligible ({})", entry.status.label())
        };
        println!(
            "- {}: {}, match {}% (weighted {}%)",
            entry.label, verdict, entry.match_score, entry.weighted_score
        );

        for gap in &entry.gaps {
            match gap.status {
                GapStatus::Met => {}
                GapStatus::Missing => println!("    missing {}", gap.skill),
                GapStatus::BelowLevel { have, need } => {
                    println!("    {} at {}, needs {}", gap.skill, have, need)
                }
            }
        }
    }
}

fn render_analysis(engine: &PlacementEngine, analysis: &PatternAnalysis) {
    println!("Rejection pattern analysis");

    let top = engine.top_missing_skills(analysis);
    if top.is_empty() {
        println!("\nCommon missing skills: none");
    } else {
        println!("\nCommon missing skills");
        for entry in top {
            println!("- {}: {} rejection(s)", entry.skill, entry.frequency);
        }
    }

    println!(
        "\nCGPA below the cutoff in most rejections: {}",
        if analysis.cgpa_issues { "yes" } else { "no" }
    );

    println!("\nImprovement priorities");
    for (index, priority) in analysis.improvement_priorities.iter().enumerate() {
        println!("{}. {}", index + 1, priority);
    }
}

fn render_simulation(result: &SimulationResult) {
    println!("Profile simulation");
    println!(
        "Eligible now: {} -> after changes: {} ({:+})",
        result.current_eligible_count, result.new_eligible_count, result.delta_eligible_count
    );

    if result.match_score_improvements.is_empty() {
        println!("\nMatch score changes: none");
    } else {
        println!("\nMatch score changes");
        for entry in &result.match_score_improvements {
            println!(
                "- {}: {}% -> {}%",
                entry.opportunity_label, entry.before, entry.after
            );
        }
    }

    if !result.recommended_path.is_empty() {
        println!("\nRecommended path");
        for (index, step) in result.recommended_path.iter().enumerate() {
            println!(
                "{}. {} (effort {}, {} now, {} long term)",
                index + 1,
                step.action,
                step.effort_estimate,
                step.immediate_yield,
                step.long_term_yield
            );
        }

        println!("\nTimeline");
        for entry in &result.timeline {
            println!("- {}: {}", entry.period, entry.action);
        }
    }

    if !result.recorded_certifications.is_empty() {
        println!(
            "\nCertifications noted (no modeled effect): {}",
            result.recorded_certifications.join(", ")
        );
    }
}

fn render_explanation(application_id: &str, request: &ExplanationRequest) {
    println!("Explanation request for application {}", application_id);
    println!("{} - {}", request.job_company, request.job_role);
    println!(
        "\nProfile source: {}",
        if request.is_snapshot {
            "snapshot at submission"
        } else {
            "live profile"
        }
    );
    println!("Student: {} (CGPA {:.2})", request.student_name, request.student_cgpa);
    println!("Student skills: {}", list_or_none(&request.student_skills));

    match request.job_min_cgpa {
        Some(min_cgpa) => println!("\nMinimum CGPA: {:.2}", min_cgpa),
        None => println!("\nMinimum CGPA: none"),
    }
    println!("Required skills: {}", list_or_none(&request.job_required_skills));
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
