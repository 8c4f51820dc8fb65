use vocabr::{pool::PoolError, VocabrError};

fn main() {
    let result = vocabr::run();
    match result {
        Ok(Some((total_correct, total))) => {
            println!(
                "You got {total_correct} correct out of {total} ({:.2}%)",
                if total == 0 {
                    0.0
                } else {
                    (total_correct as f64 / total as f64) * 100.0
                }
            );
            if total_correct == total && total > 0 {
                println!("Well done!");
            }
        }
        Ok(None) => {}
        Err(err) => match err {
            VocabrError::Pool(err) => match *err {
                PoolError::IoError(path, err) => {
                    eprintln!(
                        "IoError: {err}, path: {}",
                        path.to_str().unwrap_or("unknown")
                    )
                }
                PoolError::SerdeError(path, err) => {
                    eprintln!(
                        "SerdeError: {err}, path: {}",
                        path.to_str().unwrap_or("unknown")
                    )
                }
                PoolError::Empty(path) => eprintln!(
                    "Empty: Word list \"{}\" has no usable rows.",
                    path.to_str().unwrap_or("unknown")
                ),
                PoolError::DuplicateId(id) => {
                    eprintln!("DuplicateId: At least two rows share the id {id}")
                }
            },
            VocabrError::Stats(err) => eprintln!("Stats: {err}"),
            VocabrError::Sample(err) => eprintln!("Sample: {err}"),
            VocabrError::Arg(err) => eprintln!("Arg: {err}"),
            VocabrError::Ui(err) => match err {
                vocabr::UiError::IoError(err) => eprintln!("UiError: IoError: {err}"),
            },
            VocabrError::Panic(err) => eprintln!("Panicked: {err}"),
        },
    }
}
