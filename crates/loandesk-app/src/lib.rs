// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod forms;
pub mod ids;
pub mod model;
pub mod roster;
pub mod state;
pub mod ticker;
pub mod timer;

pub use forms::*;
pub use ids::*;
pub use model::*;
pub use roster::*;
pub use state::*;
pub use ticker::*;
pub use timer::*;
