use dense_mlp::{NetworkBuilder, TrainConfig, Vector};
use tracing_subscriber::EnvFilter;

fn main() -> dense_mlp::Result<()> {
    // RUST_LOG=debug shows per-epoch losses.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let xs: Vec<Vector<f64>> = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
        .iter()
        .map(|x| Vector::from_slice(x))
        .collect();
    let ys: Vec<Vector<f64>> = [0.0, 1.0, 1.0, 0.0]
        .iter()
        .map(|&y| Vector::from_vec(vec![y]))
        .collect();

    // 2 -> 4 -> 1, sigmoid everywhere.
    let mut net = NetworkBuilder::new(2)?
        .add_layer(4)?
        .add_layer(1)?
        .learning_rate(0.5)?
        .build_with_seed(0)?;

    let history = net.train(
        &xs,
        &ys,
        &TrainConfig {
            epochs: 5_000,
            verbose: true,
            log_every: 500,
        },
    )?;

    println!(
        "first_epoch_loss={} final_loss={}",
        history[0],
        history[history.len() - 1]
    );
    for x in &xs {
        println!("x={x} y={}", net.predict(x));
    }

    let path = std::env::temp_dir().join("xor_sigmoid.model");
    net.save(&path)?;
    let reloaded = dense_mlp::Network::<f64>::load(&path)?;
    println!("reloaded from {} -> {}", path.display(), reloaded.predict(&xs[1]));

    Ok(())
}
