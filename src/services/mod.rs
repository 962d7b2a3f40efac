pub mod adjudication;
pub mod cases;
