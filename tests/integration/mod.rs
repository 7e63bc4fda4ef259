// Integration tests harness
mod projector {
    include!("projector.rs");
}
mod ownership {
    include!("ownership.rs");
}
mod engine {
    include!("engine.rs");
}
mod round_trip {
    include!("round_trip.rs");
}
