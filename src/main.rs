use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    chatguard::cli::main()
}
