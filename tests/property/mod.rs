// Property-based tests harness
mod strategies;
mod codecs {
    include!("codecs.rs");
}
mod numeric {
    include!("numeric.rs");
}
