use std::env;
use std::error::Error;
use std::fs;

use mnist::{Mnist, MnistBuilder};
use nagnet::{Dataset, Hyper, Network};
use ndarray::Array2;
use rand::{thread_rng, Rng};

const PIXELS: usize = 28 * 28;

fn scale(images: Vec<u8>, count: usize) -> Result<Array2<f64>, Box<dyn Error>> {
    let x = Array2::from_shape_vec((count, PIXELS), images)?;
    Ok(x.mapv(|p| (p as f64 - 128.) / 256.))
}

fn load(train: usize, validation: usize) -> Result<(Dataset, Dataset), Box<dyn Error>> {
    let Mnist {
        trn_img,
        trn_lbl,
        tst_img,
        tst_lbl,
        ..
    } = MnistBuilder::new()
        .base_path("data")
        .label_format_digit()
        .training_set_length(train as u32)
        .validation_set_length(0)
        .test_set_length(validation as u32)
        .finalize();

    let labels = |l: Vec<u8>| l.into_iter().map(usize::from).collect::<Vec<usize>>();

    Ok((
        (scale(trn_img, train)?, labels(trn_lbl)),
        (scale(tst_img, validation)?, labels(tst_lbl)),
    ))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let hyper = match env::args().nth(1) {
        Some(path) => Hyper::from_json(&fs::read_to_string(path)?)?,
        None => Hyper::new(),
    };

    let ((x, y), (x_val, y_val)) = load(60_000, 10_000)?;

    let mut nn = Network::new(hyper)?;
    let history = nn
        .get_trainer()
        .verbose()
        .train(x.view(), &y, x_val.view(), &y_val)?;

    println!("{}", serde_json::to_string_pretty(&history)?);
    println!("Validation accuracy: {}%", nn.accuracy(x_val.view(), &y_val)? * 100.);

    let mut rng = thread_rng();
    for _ in 0..3 {
        let i = rng.gen_range(0..y.len());
        let prediction = nn.predict(x.row(i), Some(y[i]))?;
        println!("true digit: {}, predicted: {:?}", y[i], prediction);
    }

    Ok(())
}
