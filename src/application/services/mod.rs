pub mod optimistic_update_service;

pub use optimistic_update_service::{
    ApplyTransform, OptimisticUpdateService, UpdateHooks, UpdateRequest,
};
