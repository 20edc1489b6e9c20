pub mod client;


pub use client::MoodApiClient;
