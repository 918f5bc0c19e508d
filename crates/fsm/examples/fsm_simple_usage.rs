use fsm::{DataPatch, FlowNamespace, FsmError, InMemoryStateStore, InboundEvent, Router, StateAccess, StateStore,
          StateTag};
use std::sync::Arc;

const ASK_NAME: StateTag = StateTag::from_static("greeting.ask_name");
const DONE: StateTag = StateTag::from_static("greeting.done");

struct Services {
    store: Arc<InMemoryStateStore>,
}

impl StateAccess for Services {
    fn state_store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }
}

fn start(svc: &Services, ev: &InboundEvent) -> Result<(), FsmError> {
    println!("[{}] ¿cómo te llamas?", ev.actor_id);
    svc.store.set_state(&ev.context(), ASK_NAME)
}

fn ask_name(svc: &Services, ev: &InboundEvent) -> Result<(), FsmError> {
    println!("[{}] hola, {}", ev.actor_id, ev.text);
    svc.store.merge_data(&ev.context(), DataPatch::new().set("name", ev.text.clone()))?;
    svc.store.set_state(&ev.context(), DONE)
}

fn main() -> Result<(), FsmError> {
    let store = Arc::new(InMemoryStateStore::new());
    let router: Router<Services, FsmError> = Router::new(Services { store: store.clone() })
        .with_handler(FlowNamespace::USER, StateTag::NO_STATE, start)?
        .with_handler(FlowNamespace::USER, ASK_NAME, ask_name)?;

    // Dos actores intercalados: cada uno avanza según su propio estado.
    for (actor, text) in [(1, "hola"), (2, "buenas"), (1, "Ana"), (2, "Luis"), (1, "otra vez")] {
        let outcome = router.dispatch(&InboundEvent::text(actor, text))?;
        println!("  -> {:?}", outcome);
    }

    for actor in [1, 2] {
        let state = store.load(&fsm::ActorContext::user(actor))?;
        println!("actor {}: {} {:?}", actor, state.state, state.data.get_str("name"));
    }
    Ok(())
}
