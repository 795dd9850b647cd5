/// Example: embed the viewer component with a fixed attribute set
///
/// Usage: cargo run --example autorotate -- path/to/file.stl

use std::env;
use std::io;
use std::process;

use stlview_terminal::TerminalHost;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let Some(model) = args.get(1) else {
        eprintln!("Usage: {} <stl-file>", args[0]);
        process::exit(2);
    };

    // Continuous auto-rotation at double speed; drag still orbits and the
    // rotation keeps going afterwards
    let attrs = [("model", model.as_str()), ("autorotate", "2.0")];

    let mut host = match TerminalHost::mount(attrs) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    println!("Rotating {} (press Q to quit)...", model);
    host.run()
}
