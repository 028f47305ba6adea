use std::marker::PhantomData;
use std::sync::mpsc::{Receiver, RecvError, Sender};
use std::sync::Arc;

/// Event loop for an Elm-style core: `transition` is pure, `render` observes
/// each committed state and `run_effect` performs I/O on its own thread,
/// reporting back through the event channel.
#[derive(Debug, Clone)]
pub struct StateMachine<TState, TEvent, TEffect, T, R, E, D>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync,
    R: Fn(&TState) + Send + Sync,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync,
    D: Fn(&TState) -> bool + Send + Sync,
{
    pub init: (TState, Vec<TEffect>),
    pub transition_fn: Arc<T>,
    pub render_fn: Arc<R>,
    pub run_effect_fn: Arc<E>,
    pub is_done_fn: Arc<D>,
    _event: PhantomData<TEvent>,
}

impl<TState, TEvent, TEffect, T, R, E, D> StateMachine<TState, TEvent, TEffect, T, R, E, D>
where
    TState: Clone + Send + 'static,
    TEvent: Send + 'static,
    TEffect: Clone + Send + 'static,
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync + 'static,
    R: Fn(&TState) + Send + Sync + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
    D: Fn(&TState) -> bool + Send + Sync + 'static,
{
    pub fn new(
        init: (TState, Vec<TEffect>),
        transition_fn: T,
        render_fn: R,
        run_effect_fn: E,
        is_done_fn: D,
    ) -> Self {
        Self {
            init,
            transition_fn: Arc::new(transition_fn),
            render_fn: Arc::new(render_fn),
            run_effect_fn: Arc::new(run_effect_fn),
            is_done_fn: Arc::new(is_done_fn),
            _event: PhantomData,
        }
    }

    /// Runs until `is_done_fn` accepts a committed state, then returns it.
    ///
    /// Effects still in flight at that point keep running on their threads;
    /// whatever they send afterwards is dropped with the receiver.
    pub fn run(
        &self,
        event_sender: Sender<TEvent>,
        event_receiver: Receiver<TEvent>,
    ) -> Result<TState, RecvError> {
        let (mut state, effects) = self.init.clone();

        (self.render_fn)(&state);
        self.spawn_effects(effects, &event_sender);

        while !(self.is_done_fn)(&state) {
            let event = event_receiver.recv()?;
            let (new_state, new_effects) = (self.transition_fn)(state, event);
            state = new_state;

            (self.render_fn)(&state);
            self.spawn_effects(new_effects, &event_sender);
        }

        Ok(state)
    }

    fn spawn_effects(&self, effects: Vec<TEffect>, event_sender: &Sender<TEvent>) {
        for effect in effects {
            let effect_sender = event_sender.clone();
            let run_effect_fn = Arc::clone(&self.run_effect_fn);
            std::thread::spawn(move || {
                run_effect_fn(effect, effect_sender);
            });
        }
    }
}
