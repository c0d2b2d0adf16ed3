use delta_nn::Network;

fn main() -> delta_nn::Result<()> {
    // 4-4-4 sigmoid stack, one fixed sample/label pair, learning rate 0.5.
    let mut network = Network::demo()?;

    let iterations = 2000;
    for step in 0..iterations {
        let deviation = network.train_step()?;
        if step % 200 == 0 {
            println!("Step {step}: deviation = {:.6}", deviation.sqrt());
        }
    }

    let prediction = network.forward()?.to_vec();
    println!("Label:      {:?}", network.label());
    println!("Prediction: {:.4?}", prediction);
    Ok(())
}
