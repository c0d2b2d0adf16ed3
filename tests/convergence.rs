use delta_nn::{train_loop, Activator, Network, TrainConfig};

#[test]
fn single_unit_converges_monotonically() {
    let mut network = Network::new(&[1], Activator::Sigmoid, vec![0.2], vec![0.4]).unwrap();
    network.layers_mut()[0].initialize(1.0, 1.0);
    network.set_learning_rate(0.5).unwrap();

    let deviations: Vec<f64> = (0..200).map(|_| network.train_step().unwrap()).collect();
    network.forward().unwrap();
    let final_deviation = network.squared_deviation().unwrap();

    let non_increasing = deviations.windows(2).filter(|w| w[1] <= w[0]).count();
    assert!(non_increasing as f64 >= 0.9 * (deviations.len() - 1) as f64);
    assert!(final_deviation < 0.1 * deviations[0], "{final_deviation} vs {}", deviations[0]);
}

#[test]
fn demo_network_fits_its_label() {
    let mut network = Network::demo().unwrap();
    for layer in network.layers_mut() {
        layer.initialize(0.5, 0.0);
    }

    let initial = network.train_step().unwrap();
    let last = train_loop(&mut network, &TrainConfig::new(500)).unwrap().unwrap();
    assert!(last < 0.01 * initial, "{last} vs {initial}");

    let prediction = network.forward().unwrap().to_vec();
    for (y, t) in prediction.iter().zip(network.label()) {
        assert!((y - t).abs() < 0.01);
    }
}

#[test]
fn identical_constant_networks_train_identically() {
    let build = || {
        let mut n = Network::new(&[3, 2], Activator::Sigmoid, vec![0.1, 0.5, 0.9], vec![0.3, 0.7]).unwrap();
        for layer in n.layers_mut() {
            layer.initialize(0.2, -0.1);
        }
        n
    };
    let (mut a, mut b) = (build(), build());
    for _ in 0..50 {
        assert_eq!(a.train_step().unwrap(), b.train_step().unwrap());
    }
    assert_eq!(a.layers()[1].weights(), b.layers()[1].weights());
}
