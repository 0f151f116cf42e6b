/// Play: interactive shell for playing a session from the terminal.
///
/// Usage: play [--seed <n>] [--content <dir>] [--config <file.ron>] [--saves <dir>] [--curated]
///
/// Commands:
///   answer <text>   answer the current question in free text
///   pick <id>       pick an option of a curated event
///   continue        move on after an outcome
///   ack             acknowledge a pending setback
///   tick            let one second of the setback countdown pass
///   status          show the client's state
///   event           show the current event again
///   save <slot>     save the game
///   load <slot>     load a saved game
///   restart         start over with a new client
///   help            list commands
///   quit            exit

use health_navigator_engine::core::config::EngineConfig;
use health_navigator_engine::core::deck::EventMode;
use health_navigator_engine::core::persist::JsonFileStore;
use health_navigator_engine::core::session::{GameAction, GameSession, Transition, TurnPhase};
use health_navigator_engine::GameEngine;
use std::io::{self, BufRead, Write};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut seed = None;
    let mut content_dir = None;
    let mut config_path = None;
    let mut saves_dir = "saves".to_string();
    let mut curated = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().ok();
            }
            "--content" if i + 1 < args.len() => {
                i += 1;
                content_dir = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--saves" if i + 1 < args.len() => {
                i += 1;
                saves_dir = args[i].clone();
            }
            "--curated" => curated = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut builder = GameEngine::builder();
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    if let Some(ref dir) = content_dir {
        builder = builder.content_dir(dir);
    }
    if let Some(ref path) = config_path {
        builder = builder.config_file(path);
    } else if curated {
        builder = builder.config(EngineConfig {
            event_mode: EventMode::Curated,
            ..EngineConfig::default()
        });
    }

    let mut engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let mut store = match JsonFileStore::new(&saves_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("ERROR: cannot open save directory '{}': {}", saves_dir, e);
            std::process::exit(1);
        }
    };

    let mut session = engine.start_session();
    print_client(&session);
    print_event(&session);
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("play> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        let action = match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
                continue;
            }
            "status" | "s" => {
                print_status(&session);
                continue;
            }
            "event" | "e" => {
                print_event(&session);
                continue;
            }
            "save" => {
                if rest.is_empty() {
                    println!("Usage: save <slot>");
                    continue;
                }
                match session.save_to(&mut store, rest, "player") {
                    Ok(()) => println!("Saved to '{}'.", rest),
                    Err(e) => println!("ERROR: {}", e),
                }
                continue;
            }
            "load" => {
                if rest.is_empty() {
                    println!("Usage: load <slot>");
                    continue;
                }
                match session.load_from(&store, rest) {
                    Ok(true) => {
                        println!("Loaded '{}'.", rest);
                        print_client(&session);
                        print_event(&session);
                    }
                    Ok(false) => println!("No save named '{}'.", rest),
                    Err(e) => println!("ERROR: {}", e),
                }
                continue;
            }
            "answer" | "a" => GameAction::SubmitResponse(rest.to_string()),
            "pick" | "p" => match rest.parse::<u32>() {
                Ok(id) => match session.current_event().option(id) {
                    Some(option) => GameAction::SelectOption(option.clone()),
                    None => {
                        println!("No option {} on this event.", id);
                        continue;
                    }
                },
                Err(_) => {
                    println!("Usage: pick <id>");
                    continue;
                }
            },
            "continue" | "c" => GameAction::Continue,
            "ack" => GameAction::AcknowledgeSetback,
            "tick" | "t" => GameAction::TickSetback,
            "restart" => GameAction::Restart,
            other => {
                println!("Unknown command '{}'. Type 'help' for commands.", other);
                continue;
            }
        };

        match session.dispatch(action) {
            Ok(transition) => report(&session, transition),
            Err(e) => println!("ERROR: {}", e),
        }
    }
}

fn report(session: &GameSession, transition: Transition) {
    match transition {
        Transition::OutcomeShown { option, evaluation } => {
            if let Some(eval) = evaluation {
                println!("\nResult: {} (score {})", eval.category, eval.weighted_score);
            }
            println!("{}", option.outcome);
            println!(
                "Health {:+}  Knowledge {:+}  Confidence {:+}  Score {:+}",
                option.health_effect,
                option.knowledge_effect,
                option.confidence_effect,
                option.score_effect
            );
            print_progress(session);
            if session.is_game_over() {
                println!("\nGAME OVER: your client has given up. Type 'restart' to try again.");
            } else if session.is_game_won() {
                println!("\nYOU WON: your client is insured and using their coverage well!");
            } else {
                println!("Type 'continue' to move on.");
            }
        }
        Transition::TurnAdvanced(turn) => {
            if let Some(level) = turn.entered_level {
                println!("\n*** Level complete! Now entering {}. ***", level);
            }
            match turn.setback {
                Some(setback) => {
                    let label = if setback.is_major() { "MAJOR SETBACK" } else { "Setback" };
                    println!("\n{}: {}", label, setback.title);
                    println!("{}", setback.description);
                    println!(
                        "Health {:+}  Progress {:+}",
                        setback.health_impact, setback.progress_impact
                    );
                    println!("Type 'ack' to continue, or 'tick' to let the countdown run.");
                }
                None => print_event(session),
            }
        }
        Transition::SetbackApplied {
            health_impact,
            progress_impact,
        } => {
            println!(
                "Setback applied (health {:+}, progress {:+}).",
                health_impact, progress_impact
            );
            if session.is_game_over() {
                println!("\nGAME OVER: your client has given up. Type 'restart' to try again.");
            } else {
                print_event(session);
            }
        }
        Transition::CountdownRunning(remaining) => {
            println!("Continuing in {}...", remaining);
        }
        Transition::Restarted(_) => {
            println!("New game.");
            print_client(session);
            print_event(session);
        }
    }
}

fn print_client(session: &GameSession) {
    let client = session.client();
    println!("\nYour client: {} ({})", client.name, client.status);
    for concern in &client.concerns {
        println!("  \"{}\"", concern);
    }
}

fn print_event(session: &GameSession) {
    if *session.phase() != TurnPhase::AwaitingResponse {
        return;
    }
    let event = session.current_event();
    let state = session.state();
    println!("\n--- Turn {} · {} ---", state.turn, state.level);
    println!("{}", event.title);
    println!("{}", event.description);
    if let Some(ref prompt) = event.prompt {
        println!("\n{}", prompt);
    }
    for option in &event.options {
        println!("  [{}] {}", option.id, option.text);
    }
}

fn print_status(session: &GameSession) {
    let state = session.state();
    println!("Client:    {} ({})", session.client().name, session.client_status());
    println!("Health:    {}", state.client_health);
    println!("Score:     {}", state.score);
    println!("Level:     {} ({})", state.level, state.insurance_status);
    println!("Turn:      {}", state.turn);
    println!("Phase:     {}", session.phase());
    print_progress(session);
    if let Some((setback, remaining)) = session.pending_setback() {
        println!("Pending:   {} ({} ticks left)", setback.title, remaining);
    }
}

fn print_progress(session: &GameSession) {
    let before = session.previous_progress();
    let now = session.state().level_progress;
    println!(
        "Progress:  {:?} (was {:?})",
        now, before
    );
}

fn print_usage() {
    println!("Usage: play [--seed <n>] [--content <dir>] [--config <file.ron>] [--saves <dir>] [--curated]");
}

fn print_help() {
    println!("Commands:");
    println!("  answer <text>   answer the current question in free text");
    println!("  pick <id>       pick an option of a curated event");
    println!("  continue        move on after an outcome");
    println!("  ack             acknowledge a pending setback");
    println!("  tick            let one second of the setback countdown pass");
    println!("  status          show the client's state");
    println!("  event           show the current event again");
    println!("  save <slot>     save the game");
    println!("  load <slot>     load a saved game");
    println!("  restart         start over with a new client");
    println!("  help            list commands");
    println!("  quit            exit");
}
