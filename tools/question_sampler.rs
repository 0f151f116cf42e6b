/// Question Sampler: prints a batch of generated questions for a level,
/// optionally writing them to a JSON file.
///
/// Usage: question_sampler --level <0|1|2> [--count <n>] [--seed <n>]
///                         [--client <name>] [--content <dir>] [--output <file.json>]
use health_navigator_engine::core::content::GameContent;
use health_navigator_engine::core::generator::QuestionGenerator;
use health_navigator_engine::core::random::StdRandom;
use health_navigator_engine::schema::level::Level;
use std::env;
use std::path::Path;
use std::process;

const USAGE: &str = "Usage: question_sampler --level <0|1|2> [--count <n>] [--seed <n>] \
[--client <name>] [--content <dir>] [--output <file.json>]";

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut level = None;
    let mut count = 5usize;
    let mut seed = 42u64;
    let mut client = "Maria Garcia".to_string();
    let mut content_dir = None;
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--level" if i + 1 < args.len() => {
                i += 1;
                let index: usize = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --level must be 0, 1, or 2");
                    process::exit(1);
                });
                level = Some(Level::from_index(index).unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }));
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --count must be a number");
                    process::exit(1);
                });
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--client" if i + 1 < args.len() => {
                i += 1;
                client = args[i].clone();
            }
            "--content" if i + 1 < args.len() => {
                i += 1;
                content_dir = Some(args[i].clone());
            }
            "--output" if i + 1 < args.len() => {
                i += 1;
                output = Some(args[i].clone());
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let level = level.unwrap_or_else(|| {
        eprintln!("Error: --level is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let loaded = match content_dir {
        Some(ref dir) => GameContent::load_dir(Path::new(dir)),
        None => GameContent::builtin(),
    };
    let content = loaded.unwrap_or_else(|e| {
        eprintln!("Error loading content: {}", e);
        process::exit(1);
    });

    println!("Sampling {} questions for {} (seed {})...\n", count, level, seed);
    let generator = QuestionGenerator::new(&content.questions);
    let mut rng = StdRandom::new(seed);
    let questions = generator.questions_for_level(level, &client, count, &mut rng);

    for (n, question) in questions.iter().enumerate() {
        println!("[{}] #{} {}", n + 1, question.id, question.title);
        println!("    {}", question.description);
        if let Some(ref prompt) = question.prompt {
            println!("    > {}", prompt);
        }
        println!();
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&questions).unwrap_or_else(|e| {
            eprintln!("Error serializing questions: {}", e);
            process::exit(1);
        });
        std::fs::write(&output_path, json).unwrap_or_else(|e| {
            eprintln!("Error writing '{}': {}", output_path, e);
            process::exit(1);
        });
        println!("Questions saved to '{}'", output_path);
    }
}
