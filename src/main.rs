fn main() {
    #[cfg(feature = "cli")]
    nitrolz::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("nitrolz: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
