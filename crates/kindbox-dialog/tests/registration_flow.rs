use fsm::{ActorContext, Dispatch, FlowNamespace, InboundEvent, StateAccess, StateTag, UserProfile};
use kindbox_dialog::flows::home::HOME;
use kindbox_dialog::flows::registration::{keys, CHOOSE_SELF_OR_ORG, CONFIRM_REGISTRATION, SET_MUNICIPALITY,
                                          SET_ORGANIZATION_NAME, SET_PHONE_NUMBER};
use kindbox_dialog::{build_router, keyboards, messages, BotConfig, BotError, BotRouter, ChoiceSet, DialogStubs,
                     RecordingTransport};
use std::sync::Arc;

const ACTOR: i64 = 1001;
// cualquier texto abre el registro desde NO_STATE
const START: &str = "Начать";

fn setup() -> (Arc<RecordingTransport>, BotRouter) {
  let transport = Arc::new(RecordingTransport::new());
  let bot = DialogStubs::in_memory_bot(transport.clone(), BotConfig::default()).expect("bot");
  (transport, build_router(bot).expect("router"))
}

fn say(router: &BotRouter, text: &str) -> Dispatch {
  let ev = InboundEvent::text(ACTOR, text).with_profile(UserProfile::new("Анна", "Петрова"));
  router.dispatch(&ev).expect("dispatch")
}

fn state(router: &BotRouter) -> StateTag {
  router.services().state_store().get_state(&ActorContext::user(ACTOR)).expect("state")
}

fn data_str(router: &BotRouter, key: &str) -> Option<String> {
  let data = router.services().state_store().get_data(&ActorContext::user(ACTOR)).expect("data");
  data.get_str(key).map(str::to_string)
}

/// Lleva al actor hasta `CONFIRM_REGISTRATION` por la rama sin organización.
fn reach_confirmation(router: &BotRouter) {
  say(router, START);
  say(router, "Самара");
  say(router, keyboards::FROM_SELF);
  say(router, "+7 999 123-45-67");
  assert_eq!(state(router), CONFIRM_REGISTRATION);
}

#[test]
fn happy_path_with_organization_registers_donor_and_goes_home() {
  let (transport, router) = setup();

  assert!(say(&router, START).is_handled());
  assert_eq!(state(&router), SET_MUNICIPALITY);
  let sent = transport.sent_to(ACTOR);
  assert!(sent[0].text.starts_with("👋 Привет, Анна!"));
  assert!(sent[0].text.contains("25 декабря"));
  let kbd = sent[1].choices.clone().expect("municipality keyboard");
  assert_eq!(kbd.rows,
             vec![vec!["Жигулёвск".to_string(), "Самара".to_string()], vec!["Тольятти".to_string()]]);
  assert_eq!(data_str(&router, keys::DONOR_NAME).as_deref(), Some("Анна Петрова"));

  say(&router, "Самара");
  assert_eq!(state(&router), CHOOSE_SELF_OR_ORG);
  assert_eq!(transport.last_to(ACTOR).unwrap().choices, Some(keyboards::self_or_org_keyboard()));

  say(&router, keyboards::FROM_ORGANIZATION);
  assert_eq!(state(&router), SET_ORGANIZATION_NAME);
  assert_eq!(transport.last_to(ACTOR).unwrap().choices, Some(ChoiceSet::empty()));

  say(&router, "Фонд «Добро»");
  assert_eq!(state(&router), SET_PHONE_NUMBER);

  say(&router, "8 (999) 123-45-67");
  assert_eq!(state(&router), CONFIRM_REGISTRATION);
  let summary = transport.last_to(ACTOR).unwrap();
  assert_eq!(summary.text, messages::registration_summary("Самара", Some("Фонд «Добро»"), "+79991234567"));
  assert_eq!(summary.choices, Some(keyboards::yes_no_keyboard()));

  say(&router, keyboards::YES);
  assert_eq!(state(&router), HOME);
  let donor = router.services().domain().find_donor_by_user_id(ACTOR).unwrap().expect("donor saved");
  let samara = router.services().domain().find_municipality_by_name("Самара").unwrap().unwrap();
  assert_eq!(donor.name(), "Анна Петрова");
  assert_eq!(donor.organization_name(), Some("Фонд «Добро»"));
  assert_eq!(donor.phone_number().as_str(), "+79991234567");
  assert_eq!(donor.municipality_id(), samara.id());

  let sent = transport.sent_to(ACTOR);
  let n = sent.len();
  assert_eq!(sent[n - 2].text, messages::REGISTRATION_SUCCEEDED);
  assert_eq!(sent[n - 1].choices, Some(keyboards::home_keyboard()));
}

#[test]
fn self_participation_stores_no_organization() {
  let (transport, router) = setup();
  reach_confirmation(&router);
  assert!(data_str(&router, keys::ORGANIZATION_NAME).is_none());
  assert!(transport.last_to(ACTOR).unwrap().text.contains("не от имени организации"));

  say(&router, keyboards::YES);
  assert_eq!(state(&router), HOME);
  let donor = router.services().domain().find_donor_by_user_id(ACTOR).unwrap().unwrap();
  let samara = router.services().domain().find_municipality_by_name("Самара").unwrap().unwrap();
  assert_eq!(donor.organization_name(), None);
  assert_eq!(donor.municipality_id(), samara.id());
  assert_eq!(donor.phone_number().as_str(), "+79991234567");
}

#[test]
fn rejection_clears_answers_and_restarts_at_municipality() {
  let (transport, router) = setup();
  reach_confirmation(&router);

  say(&router, keyboards::NO);
  assert_eq!(state(&router), SET_MUNICIPALITY);
  assert!(data_str(&router, keys::MUNICIPALITY_NAME).is_none());
  assert!(data_str(&router, keys::PHONE_NUMBER).is_none());
  assert!(data_str(&router, keys::ORGANIZATION_NAME).is_none());
  assert_eq!(data_str(&router, keys::DONOR_NAME).as_deref(), Some("Анна Петрова"));
  assert!(router.services().domain().find_donor_by_user_id(ACTOR).unwrap().is_none());

  let sent = transport.sent_to(ACTOR);
  let n = sent.len();
  assert_eq!(sent[n - 2].text, messages::REGISTRATION_REJECTED);
  assert_eq!(sent[n - 1].text, messages::REQUEST_MUNICIPALITY);
}

#[test]
fn invalid_input_keeps_state_and_re_prompts() {
  let (transport, router) = setup();
  say(&router, START);

  say(&router, "Москва");
  assert_eq!(state(&router), SET_MUNICIPALITY);
  assert_eq!(transport.last_to(ACTOR).unwrap().text, messages::UNKNOWN_MUNICIPALITY);
  // exact match only
  say(&router, "самара");
  assert_eq!(state(&router), SET_MUNICIPALITY);

  say(&router, "Самара");
  say(&router, "не знаю");
  assert_eq!(state(&router), CHOOSE_SELF_OR_ORG);
  assert_eq!(transport.last_to(ACTOR).unwrap().text, messages::INVALID_OPTION);

  say(&router, keyboards::FROM_SELF);
  say(&router, "двенадцать");
  assert_eq!(state(&router), SET_PHONE_NUMBER);
  assert_eq!(transport.last_to(ACTOR).unwrap().text, messages::not_a_phone_number());
  assert!(data_str(&router, keys::PHONE_NUMBER).is_none());
}

#[test]
fn confirmation_accepts_only_exact_labels() {
  let (transport, router) = setup();
  reach_confirmation(&router);

  for answer in ["да", "Да!", "yes", ""] {
    let before = transport.sent_to(ACTOR).len();
    say(&router, answer);
    assert_eq!(state(&router), CONFIRM_REGISTRATION, "answer {:?}", answer);
    let sent = transport.sent_to(ACTOR);
    assert_eq!(sent.len(), before + 2);
    assert_eq!(sent[before].text, messages::INVALID_OPTION);
    assert!(sent[before + 1].text.starts_with("Давай проверим данные:"));
  }
  assert!(router.services().domain().list_donors().unwrap().is_empty());
}

#[test]
fn organization_name_limit_is_500_characters() {
  let (transport, router) = setup();
  say(&router, START);
  say(&router, "Тольятти");
  say(&router, keyboards::FROM_ORGANIZATION);

  // 501 multibyte characters: rejected even though 500 would be far below in bytes
  let too_long = "я".repeat(501);
  say(&router, &too_long);
  assert_eq!(state(&router), SET_ORGANIZATION_NAME);
  assert_eq!(transport.last_to(ACTOR).unwrap().text, messages::organization_name_too_long());

  let longest = "я".repeat(500);
  say(&router, &longest);
  assert_eq!(state(&router), SET_PHONE_NUMBER);
  assert_eq!(data_str(&router, keys::ORGANIZATION_NAME), Some(longest));
}

#[test]
fn registered_donor_without_state_goes_home() {
  let (transport, router) = setup();
  reach_confirmation(&router);
  say(&router, keyboards::YES);

  let ctx = ActorContext::user(ACTOR);
  router.services().state_store().set_state(&ctx, StateTag::NO_STATE).unwrap();
  say(&router, "привет");
  assert_eq!(state(&router), HOME);
  assert_eq!(router.services().domain().list_donors().unwrap().len(), 1);
  assert_eq!(transport.last_to(ACTOR).unwrap().choices, Some(keyboards::home_keyboard()));
}

#[test]
fn vanished_municipality_sends_user_back_to_choose_one() {
  let (transport, router) = setup();
  reach_confirmation(&router);
  let samara = router.services().domain().find_municipality_by_name("Самара").unwrap().unwrap();
  router.services().domain().delete_municipality(&samara.id()).unwrap();

  say(&router, keyboards::YES);
  assert_eq!(state(&router), SET_MUNICIPALITY);
  assert!(router.services().domain().find_donor_by_user_id(ACTOR).unwrap().is_none());
  assert!(data_str(&router, keys::MUNICIPALITY_NAME).is_none());
  let kbd = transport.last_to(ACTOR).unwrap().choices.unwrap();
  assert!(kbd.labels().all(|l| l != "Самара"));
}

#[test]
fn transport_failure_leaves_state_for_retry() {
  let (transport, router) = setup();
  say(&router, START);

  transport.set_failing(true);
  let ev = InboundEvent::text(ACTOR, "Самара");
  assert!(matches!(router.dispatch(&ev), Err(BotError::Transport(_))));
  assert_eq!(state(&router), SET_MUNICIPALITY);

  transport.set_failing(false);
  say(&router, "Самара");
  assert_eq!(state(&router), CHOOSE_SELF_OR_ORG);
}

#[test]
fn repeated_confirmation_does_not_create_second_donor() {
  let (transport, router) = setup();
  reach_confirmation(&router);

  // the donor is saved but the success message cannot be delivered
  transport.set_failing(true);
  assert!(router.dispatch(&InboundEvent::text(ACTOR, keyboards::YES)).is_err());
  assert_eq!(state(&router), CONFIRM_REGISTRATION);

  transport.set_failing(false);
  say(&router, keyboards::YES);
  assert_eq!(state(&router), HOME);
  assert_eq!(router.services().domain().list_donors().unwrap().len(), 1);
}

#[test]
fn profile_is_fetched_from_transport_when_event_has_none() {
  let (transport, router) = setup();
  transport.add_profile(ACTOR, UserProfile::new("Олег", "Сидоров")).unwrap();
  router.dispatch(&InboundEvent::text(ACTOR, "/start")).expect("dispatch");
  assert_eq!(data_str(&router, keys::DONOR_NAME).as_deref(), Some("Олег Сидоров"));
  assert!(transport.sent_to(ACTOR)[0].text.starts_with("👋 Привет, Олег!"));
}

#[test]
fn home_menu_answers_info_and_repeats_itself() {
  let (transport, router) = setup();
  reach_confirmation(&router);
  say(&router, keyboards::YES);

  say(&router, keyboards::GIFTS_INFO);
  assert_eq!(state(&router), HOME);
  assert_eq!(transport.last_to(ACTOR).unwrap().text, messages::gifts_info("25 декабря"));

  say(&router, keyboards::CHOOSE_RECIPIENTS);
  assert_eq!(transport.last_to(ACTOR).unwrap().choices, Some(keyboards::home_keyboard()));
  say(&router, "что-то еще");
  assert_eq!(transport.last_to(ACTOR).unwrap().text, messages::HOME);
  assert_eq!(state(&router), HOME);
}

#[test]
fn admin_namespace_has_no_handlers() {
  let (transport, router) = setup();
  let ev = InboundEvent::text(ACTOR, START).in_namespace(FlowNamespace::ADMIN);
  assert_eq!(router.dispatch(&ev).unwrap(), Dispatch::Dropped { state: StateTag::NO_STATE });
  assert_eq!(transport.total_sent(), 0);
  assert_eq!(state(&router), StateTag::NO_STATE);
}
