//! # Skybook Core
//!
//! Core traits and types for the Skybook booking controllers.
//!
//! Skybook models interactive booking screens as explicit state machines:
//! every controller is a [`reducer::Reducer`] — a pure function
//! `(State, Action, Environment) → Effects` — whose state can be inspected
//! and serialized at any point, and whose side effects are returned as
//! values rather than executed inline.
//!
//! ## Core Concepts
//!
//! - **State**: the full, owned state of one screen (wizard step, form
//!   fields, derived view data)
//! - **Action**: every input the screen can receive — user events and the
//!   completion events of remote calls
//! - **Reducer**: the pure transition function containing all business logic
//! - **Effect**: a description of a side effect (a remote call, a parallel
//!   group); executed by the runtime's `Store`, never by the reducer
//! - **Environment**: injected dependencies behind traits ([`environment::Clock`],
//!   [`environment::RandomSource`], service gateways)
//!
//! Keeping reducers pure means every transition — including validation
//! guards and failure paths — is testable without a rendering surface or a
//! live backend.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for screen controllers
///
/// Reducers are pure functions: `(State, Action, Environment) → Effects`.
/// They contain all transition logic and are deterministic given their
/// inputs; anything nondeterministic (time, randomness, remote services)
/// comes in through the environment.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for a screen's state machine.
    ///
    /// # Type Parameters
    ///
    /// - `State`: the state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for LookupReducer {
    ///     type State = LookupState;
    ///     type Action = LookupAction;
    ///     type Environment = LookupEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut LookupState,
    ///         action: LookupAction,
    ///         env: &LookupEnvironment,
    ///     ) -> SmallVec<[Effect<LookupAction>; 4]> {
    ///         match action {
    ///             LookupAction::Submit => {
    ///                 state.is_loading = true;
    ///                 smallvec![/* remote call effect */]
    ///             },
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and compose: a reducer can return several effects,
/// and a [`Effect::Parallel`] group runs its children concurrently.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Describes a side effect to be executed by the Store runtime.
    ///
    /// Effects are NOT executed when a reducer returns them. The Store
    /// spawns them, and any action a completed effect produces is fed back
    /// into the reducer — this is how a remote call's success or failure
    /// re-enters the state machine.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation.
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer and broadcast to store observers.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter, so reducers stay deterministic under test.
pub mod environment {
    use chrono::{DateTime, Utc};
    use rand::Rng;

    /// Clock trait - abstracts time operations for testability.
    ///
    /// Production uses [`SystemClock`]; tests inject a fixed clock so
    /// time-derived view data (departure countdowns, refund tiers) is
    /// deterministic.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock - returns the actual current time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Random source trait - abstracts uniform random draws.
    ///
    /// Anything probabilistic in a reducer's output (seat-map occupancy)
    /// draws through this trait, so tests can inject a seeded source and
    /// assert deterministic layouts.
    pub trait RandomSource: Send + Sync {
        /// Uniform draw in `[0, 1)`.
        fn next_unit(&self) -> f64;
    }

    /// Thread-local RNG backed random source for production use.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemRandom;

    impl RandomSource for SystemRandom {
        fn next_unit(&self) -> f64 {
            rand::thread_rng().gen_range(0.0..1.0)
        }
    }
}
