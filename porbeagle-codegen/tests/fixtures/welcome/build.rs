fn main() {
    if let Err(error) = porbeagle_codegen::Builder::new().generate() {
        panic!("view generation failed: {}", error);
    }
}
