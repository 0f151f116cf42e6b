/// Scripted playthrough: plays one seeded game with canned answers and
/// prints each turn.
///
/// Strong answers push the client through Awareness, Enrollment and
/// Utilization; setbacks are acknowledged as soon as they appear.
///
/// Run with: cargo run --example scripted_playthrough

use health_navigator_engine::core::persist::{MemoryStore, SaveStore};
use health_navigator_engine::schema::level::Level;
use health_navigator_engine::GameEngine;

const MAX_TURNS: usize = 40;

fn answer_for(level: Level) -> &'static str {
    match level {
        Level::Awareness => {
            "I'll explain the premium, deductible, copay and the subsidies and \
             financial assistance that make essential health benefits affordable."
        }
        Level::Enrollment => {
            "Let's compare plans during open enrollment, check the provider network \
             and eligibility for a premium tax credit on a silver metal tier plan."
        }
        Level::Utilization => {
            "Use in-network providers, schedule preventive services, read the \
             explanation of benefits and use the appeal process if a claim is denied."
        }
    }
}

fn main() {
    let mut engine = GameEngine::builder()
        .seed(2024)
        .build()
        .expect("built-in content should load");
    let mut session = engine.start_session();

    println!("=== Health Navigator: scripted playthrough ===\n");
    println!("Client: {}", session.client().name);
    for concern in &session.client().concerns {
        println!("  \"{}\"", concern);
    }

    let mut store = MemoryStore::new();

    for _ in 0..MAX_TURNS {
        if session.is_game_over() || session.is_game_won() {
            break;
        }

        let event = session.current_event().clone();
        let state = session.state().clone();
        println!("\n--- Turn {} · {} ---", state.turn, state.level);
        println!("{}", event.title);
        println!("{}", event.description);

        let eval = session
            .submit_response(answer_for(event.level))
            .expect("session should accept an answer");
        println!(
            "  -> {} (score {}): {}",
            eval.category, eval.weighted_score, eval.outcome_message
        );
        println!(
            "  health {} | progress {:?} | score {}",
            session.state().client_health,
            session.state().level_progress,
            session.state().score
        );

        if session.is_game_over() || session.is_game_won() {
            break;
        }

        let report = session.continue_turn().expect("outcome should be showing");
        if let Some(level) = report.entered_level {
            println!("\n*** Level up: {} ({}) ***", level, session.state().insurance_status);
            session
                .save_to(&mut store, "checkpoint", "demo")
                .expect("memory store accepts saves");
        }
        if let Some(setback) = report.setback {
            println!("\n!! Setback: {} ({:+} health, {:+} progress)", setback.title, setback.health_impact, setback.progress_impact);
            session.acknowledge_setback().expect("setback should be pending");
        }
    }

    println!("\n=== Final ===");
    let state = session.state();
    println!("Turn {} · {} · {}", state.turn, state.level, state.insurance_status);
    println!("Health {} ({})", state.client_health, session.client_status());
    println!("Score {}", state.score);
    if session.is_game_won() {
        println!("The client is insured and confidently using their coverage.");
    } else if session.is_game_over() {
        println!("The client gave up on the process.");
    } else {
        println!("Stopped after {} turns.", MAX_TURNS);
    }

    if let Ok(Some(json)) = store.load("checkpoint") {
        println!("\nLast checkpoint save:\n{}", json);
    }
}
