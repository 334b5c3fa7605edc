mod cli;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();
    cli::exec()
}
