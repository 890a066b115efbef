use rs_markov_core::io::latin1_to_string;
use rs_markov_core::{GenerationInput, Generator, NO_CHARACTER, StartSeed};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Train an order-4 model on every .txt file of the "data" directory
    // The seed makes every run print the same passages
    let mut app: Generator = Generator::load("./data", 4, 42)?;
    println!("Trained on: {}", app.trained_files().join(", "));
    println!("Distinct kgrams: {}", app.model().len());

    // Frequency queries take a kgram of exactly 'order' characters
    let model = app.model();
    println!("'the ' seen {} times", model.frequency(b"the ")?);
    println!("'the ' followed by 'c' {} times", model.frequency_of(b"the ", b'c')?);
    println!("'the ' ending a text {} times", model.frequency_of(b"the ", NO_CHARACTER)?);

    // Attempting to query a kgram of the wrong length
    match model.frequency(b"the") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Invalid kgram: {e}"),
    }

    // Sampling one character at a time
    match app.model_mut().sample_next(b"the ") {
        NO_CHARACTER => println!("'the ' has no successor"),
        c => println!("After 'the ': '{}'", latin1_to_string(&[c])),
    }

    // Start seed can be set to
    // 'Text' to start from the beginning of the first trained file
    // 'Random' to start from any kgram of the model
    // 'Custom' to start from a given kgram
    let mut input = GenerationInput::default();
    input.set_max_length(300)?;

    // Invalid generation length
    match input.set_max_length(0) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Length 0 is invalid, must be at least 1"),
    }

    println!("\n--- from the start of the text ---\n{}", app.generate_string(&input)?);

    input.start_seed = StartSeed::Custom(b"The ".to_vec());
    println!("\n--- from 'The ' ---\n{}", app.generate_string(&input)?);

    // Generate 10 passages from random kgrams
    input.start_seed = StartSeed::Random;
    for i in 0..10 {
        println!("\n--- random passage {} ---\n{}", i + 1, app.generate_string(&input)?);
    }

    Ok(())
}
