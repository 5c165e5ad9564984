// Models module

mod todo;

pub use todo::Todo;
