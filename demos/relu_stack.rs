use delta_nn::{Activator, Network};

fn main() -> delta_nn::Result<()> {
    // Narrowing ReLU stack: 3 -> 5 -> 2.
    let mut network = Network::new(
        &[3, 5, 2],
        Activator::ReLU,
        vec![0.5, 0.25, 1.0],
        vec![0.3, 0.9],
    )?;
    network.set_learning_rate(0.05)?;

    for step in 0..500 {
        let deviation = network.train_step()?;
        if step % 50 == 0 {
            println!("Step {step}: squared deviation = {deviation:.6}");
        }
    }

    println!("Prediction: {:.4?}", network.forward()?);
    println!("Label:      {:?}", network.label());
    Ok(())
}
