/// STLView Terminal - STL model viewer
///
/// Usage: stlview-terminal <model.stl> [--autorotate[=SPEED|initial]]
/// Controls:
///   - Mouse drag / WASD / Arrow Keys: Orbit the camera
///   - Scroll / +/-: Zoom
///   - Q/ESC: Quit

use std::env;
use std::io;
use std::process;

use stlview_terminal::TerminalHost;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    // Assemble the attribute surface from the command line: the positional
    // argument is the model source, the flag is passed through verbatim
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    for arg in &args[1..] {
        if let Some(value) = arg.strip_prefix("--autorotate=") {
            attrs.push(("autorotate", value));
        } else if arg == "--autorotate" {
            attrs.push(("autorotate", ""));
        } else if !attrs.iter().any(|(name, _)| *name == "model") {
            attrs.push(("model", arg.as_str()));
        }
    }

    let mut host = match TerminalHost::mount(attrs) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: {} <model.stl> [--autorotate[=SPEED|initial]]", args[0]);
            process::exit(2);
        }
    };

    println!("STLView Terminal - loading model (press Q to quit)...");
    host.run()?;

    println!("Thank you for using STLView!");
    Ok(())
}
