mod about;
mod studio;

pub use about::About;
pub use studio::Studio;
