/// Play — interactive text shell for walking campaign packs and rolling dice.
///
/// Usage: play [--packs <dir>] [--seed <n>]
///
/// Commands:
///   packs              — list available packs
///   load <id>          — load a pack by id and enter its start scene
///   look               — show the current scene and its choices
///   choose <n>         — follow the n-th choice (1-based)
///   goto <scene_id>    — jump to a scene by id
///   roll <formula>     — roll dice, e.g. roll 2d6+1
///   seed <n>           — reseed the dice
///   help               — list commands
///   quit               — exit

use campaign_engine::core::dice::DiceRoller;
use campaign_engine::core::loader::PackLibrary;
use campaign_engine::core::state::NarrativeState;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut packs_dir = "packs".to_string();
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--packs" if i + 1 < args.len() => {
                i += 1;
                packs_dir = args[i].clone();
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                match parse_seed(&args[i]) {
                    Ok(n) => seed = Some(n),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let library = PackLibrary::new(&packs_dir);
    let mut state = NarrativeState::new();
    let mut dice = match seed {
        Some(s) => DiceRoller::seeded(s),
        None => DiceRoller::new(),
    };

    println!("Pack directory: {}", library.dir().display());
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

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "packs" => match library.list_packs() {
                Ok(packs) if packs.is_empty() => println!("No packs found."),
                Ok(packs) => {
                    for pack in packs {
                        println!("  {:<24} {}", pack.id, pack.title);
                    }
                }
                Err(e) => println!("ERROR: {}", e),
            },
            "load" => {
                if rest.is_empty() {
                    println!("Usage: load <pack_id>");
                    continue;
                }
                match library.load_pack(rest) {
                    Ok(pack) => {
                        println!("Loaded '{}': {}", pack.meta.title, pack.meta.description);
                        state.load_pack(pack);
                        print_scene(&state);
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "look" | "l" => print_scene(&state),
            "choose" | "c" => {
                let index = match rest.parse::<usize>() {
                    Ok(n) if n >= 1 => n - 1,
                    _ => {
                        println!("Usage: choose <n>  (1-based choice number)");
                        continue;
                    }
                };
                if index >= state.choices().len() {
                    println!("No choice {}.", index + 1);
                    continue;
                }
                if state.choose(index) {
                    print_scene(&state);
                } else {
                    println!("Nothing happens.");
                }
            }
            "goto" => {
                if rest.is_empty() {
                    println!("Usage: goto <scene_id>");
                    continue;
                }
                if state.goto_scene(rest) {
                    print_scene(&state);
                } else {
                    println!("No scene '{}' in the loaded pack.", rest);
                }
            }
            "roll" | "r" => {
                if rest.is_empty() {
                    println!("Usage: roll <formula>  (e.g. 1d20+3 or 2d6-1)");
                    continue;
                }
                match dice.roll(rest) {
                    Ok(result) => println!("{}", result),
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "seed" => match parse_seed(rest) {
                Ok(n) => {
                    dice = DiceRoller::seeded(n);
                    println!("Dice reseeded with {}", n);
                }
                Err(e) => println!("{}. Usage: seed <n>", e),
            },
            _ => {
                println!("Unknown command '{}'. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn print_scene(state: &NarrativeState) {
    let Some(scene) = state.current_scene() else {
        println!("Nothing loaded. Use 'packs' and 'load <id>'.");
        return;
    };

    println!("\n=== {} ===", scene.title);
    println!("{}\n", scene.text);

    if state.choices().is_empty() {
        println!("(The story ends here.)\n");
        return;
    }
    for (n, choice) in state.choices().iter().enumerate() {
        match choice.target() {
            Some(_) => println!("  {}. {}", n + 1, choice.label),
            None => println!("  {}. {} (ends)", n + 1, choice.label),
        }
    }
    println!();
}

fn parse_seed(value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("seed must be a non-negative integer, got '{}'", value))
}

fn print_usage() {
    println!("Usage: play [--packs <dir>] [--seed <n>]");
}

fn print_help() {
    println!("Commands:");
    println!("  packs              list available packs");
    println!("  load <id>          load a pack by id");
    println!("  look               show the current scene");
    println!("  choose <n>         follow the n-th choice");
    println!("  goto <scene_id>    jump to a scene");
    println!("  roll <formula>     roll dice, e.g. 2d6+1");
    println!("  seed <n>           reseed the dice");
    println!("  help               this list");
    println!("  quit               exit");
}
