use doctriage::cli;

fn output_header() -> &'static str {
    "DocTriage\nDocTriage replays inbound customer documents through a fixed workflow runner and a guardrailed agent runner, and scores both against gold labels."
}

fn print_header() {
    println!("{}\n", output_header());
}

fn run() -> Result<(), String> {
    print_header();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = cli::run(args)?;
    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
