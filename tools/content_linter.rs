/// Content Linter: checks game content tables for entries that can never
/// fire or that skew scoring.
///
/// Usage: content_linter [<content_dir>]
///
/// Without a directory the built-in content is checked.

use health_navigator_engine::core::content::GameContent;
use health_navigator_engine::schema::event::Category;
use health_navigator_engine::schema::level::Level;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;
use std::process;

const MIN_POOL_SIZE: usize = 3;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: content_linter [<content_dir>]");
        process::exit(0);
    }

    let loaded = match args.get(1) {
        Some(dir) => {
            if !Path::new(dir).is_dir() {
                eprintln!("ERROR: Path '{}' is not a directory", dir);
                process::exit(1);
            }
            println!("Checking content in {}", dir);
            GameContent::load_dir(Path::new(dir))
        }
        None => {
            println!("Checking built-in content");
            GameContent::builtin()
        }
    };

    let content = match loaded {
        Ok(content) => content,
        Err(e) => {
            eprintln!("ERROR: Failed to load content: {}", e);
            process::exit(1);
        }
    };

    let (errors, warnings) = lint_content(&content);

    println!("\n=== Content Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_content(content: &GameContent) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    lint_keywords(content, &mut errors, &mut warnings);
    lint_questions(content, &mut warnings);
    lint_events(content, &mut errors, &mut warnings);
    lint_setbacks(content, &mut warnings);

    (errors, warnings)
}

fn lint_keywords(content: &GameContent, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    for level in Level::ALL {
        let group = content.keywords.group(level);
        // keyword -> first tier it appeared in
        let mut first_tier: FxHashMap<&str, Category> = FxHashMap::default();

        for category in Category::KEYWORD_TIERS {
            let keywords = group.keywords(category);
            if keywords.is_empty() {
                errors.push(format!("{} has no '{}' keywords", level, category));
                continue;
            }

            let mut seen = FxHashSet::default();
            for keyword in keywords {
                if keyword.trim().is_empty() {
                    errors.push(format!("{} '{}' contains a blank keyword", level, category));
                    continue;
                }
                if keyword.chars().any(|c| c.is_uppercase()) {
                    warnings.push(format!(
                        "{} '{}' keyword \"{}\" has uppercase letters and can never match",
                        level, category, keyword
                    ));
                }
                if !seen.insert(keyword.as_str()) {
                    warnings.push(format!(
                        "{} '{}' lists \"{}\" more than once; each copy counts",
                        level, category, keyword
                    ));
                    continue;
                }
                match first_tier.get(keyword.as_str()) {
                    Some(other) if *other != category => warnings.push(format!(
                        "{} keyword \"{}\" appears in both '{}' and '{}'",
                        level, keyword, other, category
                    )),
                    Some(_) => {}
                    None => {
                        first_tier.insert(keyword.as_str(), category);
                    }
                }
            }
        }
    }
}

fn lint_questions(content: &GameContent, warnings: &mut Vec<String>) {
    for (level, pools) in content.questions.iter() {
        let sizes = [
            ("situations", pools.situations.len()),
            ("titles", pools.titles.len()),
            ("challenges", pools.challenges.len()),
            ("prompts", pools.prompts.len()),
        ];
        for (name, len) in sizes {
            if len < MIN_POOL_SIZE {
                warnings.push(format!(
                    "{} {} pool has only {} entries (minimum {} recommended)",
                    level, name, len, MIN_POOL_SIZE
                ));
            }
        }
    }
}

fn lint_events(content: &GameContent, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    for level in Level::ALL {
        if !content.events.iter().any(|e| e.level == level) {
            warnings.push(format!(
                "No curated events for {}; curated mode will always generate",
                level
            ));
        }
    }

    for event in &content.events {
        if event.options.is_empty() {
            warnings.push(format!(
                "Curated event {} '{}' has no options and will be answered in free text",
                event.id, event.title
            ));
        }
        let mut ids = FxHashSet::default();
        for option in &event.options {
            if !ids.insert(option.id) {
                errors.push(format!(
                    "Event {} has duplicate option id {}",
                    event.id, option.id
                ));
            }
            if option.outcome.is_empty() {
                warnings.push(format!(
                    "Event {} option {} has no outcome text",
                    event.id, option.id
                ));
            }
        }
    }
}

fn lint_setbacks(content: &GameContent, warnings: &mut Vec<String>) {
    for setback in &content.setbacks {
        if setback.levels.is_empty() {
            warnings.push(format!(
                "Setback {} '{}' lists no levels and can never strike",
                setback.id, setback.title
            ));
        }
        if setback.probability == 0 {
            warnings.push(format!(
                "Setback {} '{}' has weight 0 and can never be picked",
                setback.id, setback.title
            ));
        }
    }

    for level in Level::ALL {
        if !content.setbacks.iter().any(|s| s.applies_to(level)) {
            warnings.push(format!("No setbacks apply to {}", level));
        }
    }
}
