use quizdig_core::error::QuizdigError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), QuizdigError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
