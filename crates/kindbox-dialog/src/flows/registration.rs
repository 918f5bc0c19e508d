// Archivo: registration.rs
// Propósito: flujo de registro de donantes. Un handler por estado; cada
// handler valida el texto, acumula datos y escribe el estado siguiente al
// final, de modo que un fallo de almacenamiento o de transporte deja el paso
// listo para reintentarse.
use crate::bot::{Bot, BotRouter};
use crate::confirmation::{handle_confirmation, request_confirmation};
use crate::errors::Result;
use crate::flows::home;
use crate::keyboards::{self, Confirmation, SelfOrOrg};
use crate::messages;
use crate::transport::{ChoiceSet, OutboundMessage};
use fsm::{ActorContext, DataPatch, FlowNamespace, FsmError, InboundEvent, StateAccess, StateData, StateTag};
use kindbox_domain::{parse_phone_number, DomainError, Donor, MAX_ORGANIZATION_NAME_LEN};

pub const SET_MUNICIPALITY: StateTag = StateTag::from_static("registration.set_municipality");
pub const CHOOSE_SELF_OR_ORG: StateTag = StateTag::from_static("registration.choose_self_or_org");
pub const SET_ORGANIZATION_NAME: StateTag = StateTag::from_static("registration.set_organization_name");
pub const SET_PHONE_NUMBER: StateTag = StateTag::from_static("registration.set_phone_number");
pub const CONFIRM_REGISTRATION: StateTag = StateTag::from_static("registration.confirm_registration");

/// Claves de los datos acumulados durante el registro.
pub mod keys {
  pub const DONOR_NAME: &str = "donor_name";
  pub const MUNICIPALITY_NAME: &str = "municipality_name";
  pub const ORGANIZATION_NAME: &str = "organization_name";
  pub const PHONE_NUMBER: &str = "phone_number";
}

pub fn register(router: &mut BotRouter) -> fsm::Result<()> {
  router.register(FlowNamespace::USER, StateTag::NO_STATE, start)?;
  router.register(FlowNamespace::USER, SET_MUNICIPALITY, set_municipality)?;
  router.register(FlowNamespace::USER, CHOOSE_SELF_OR_ORG, choose_self_or_org)?;
  router.register(FlowNamespace::USER, SET_ORGANIZATION_NAME, set_organization_name)?;
  router.register(FlowNamespace::USER, SET_PHONE_NUMBER, set_phone_number)?;
  router.register(FlowNamespace::USER, CONFIRM_REGISTRATION, confirm_registration)?;
  Ok(())
}

/// `NO_STATE`: un donante ya registrado vuelve al menú; cualquier otro
/// usuario recibe la bienvenida y empieza por la localidad.
pub fn start(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  if let Some(donor) = bot.domain().find_donor_by_user_id(event.actor_id)? {
    log::warn!("el donante {} ya registrado llegó sin estado; se envía al menú principal", donor);
    return home::send_home(bot, &ctx);
  }

  let profile = match &event.profile {
    Some(p) => p.clone(),
    None => bot.transport().fetch_user_profile(event.actor_id)?,
  };
  bot.state_store()
     .merge_data(&ctx, DataPatch::new().set(keys::DONOR_NAME, profile.display_name()))?;
  bot.send(&ctx,
           OutboundMessage::text(messages::welcome(&profile.first_name, &bot.config().deadline)))?;
  request_municipality(bot, &ctx)?;
  bot.state_store().set_state(&ctx, SET_MUNICIPALITY)?;
  log::info!("el usuario {} ({}) comenzó el registro", profile.display_name(), ctx);
  Ok(())
}

/// Envía la lista de localidades participantes como teclado.
pub fn request_municipality(bot: &Bot, ctx: &ActorContext) -> Result<()> {
  let municipalities = bot.domain().list_municipalities()?;
  bot.send(ctx,
           OutboundMessage::with_choices(messages::REQUEST_MUNICIPALITY,
                                         keyboards::municipalities_keyboard(&municipalities)))
}

pub fn set_municipality(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  let name = event.text.as_str();
  if bot.domain().find_municipality_by_name(name)?.is_none() {
    return bot.send(&ctx, OutboundMessage::text(messages::UNKNOWN_MUNICIPALITY));
  }
  bot.state_store()
     .merge_data(&ctx, DataPatch::new().set(keys::MUNICIPALITY_NAME, name))?;
  bot.send(&ctx,
           OutboundMessage::with_choices(messages::REQUEST_SELF_OR_ORG, keyboards::self_or_org_keyboard()))?;
  bot.state_store().set_state(&ctx, CHOOSE_SELF_OR_ORG)?;
  Ok(())
}

pub fn choose_self_or_org(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  match SelfOrOrg::from_label(&event.text) {
    Some(SelfOrOrg::FromSelf) => {
      bot.state_store()
         .merge_data(&ctx, DataPatch::new().clear(keys::ORGANIZATION_NAME))?;
      request_phone_number(bot, &ctx)?;
      bot.state_store().set_state(&ctx, SET_PHONE_NUMBER)?;
    }
    Some(SelfOrOrg::FromOrganization) => {
      bot.send(&ctx,
               OutboundMessage::with_choices(messages::REQUEST_ORGANIZATION_NAME, ChoiceSet::empty()))?;
      bot.state_store().set_state(&ctx, SET_ORGANIZATION_NAME)?;
    }
    None => bot.send(&ctx, OutboundMessage::text(messages::INVALID_OPTION))?,
  }
  Ok(())
}

pub fn set_organization_name(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  let organization_name = event.text.as_str();
  if organization_name.chars().count() > MAX_ORGANIZATION_NAME_LEN {
    return bot.send(&ctx, OutboundMessage::text(messages::organization_name_too_long()));
  }
  bot.state_store()
     .merge_data(&ctx, DataPatch::new().set(keys::ORGANIZATION_NAME, organization_name))?;
  request_phone_number(bot, &ctx)?;
  bot.state_store().set_state(&ctx, SET_PHONE_NUMBER)?;
  Ok(())
}

pub fn request_phone_number(bot: &Bot, ctx: &ActorContext) -> Result<()> {
  bot.send(ctx,
           OutboundMessage::with_choices(messages::REQUEST_PHONE_NUMBER, ChoiceSet::empty()))
}

pub fn set_phone_number(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  let phone_number = match parse_phone_number(&event.text) {
    Ok(p) => p,
    Err(_) => return bot.send(&ctx, OutboundMessage::text(messages::not_a_phone_number())),
  };
  bot.state_store()
     .merge_data(&ctx, DataPatch::new().set(keys::PHONE_NUMBER, phone_number.as_str()))?;
  request_registration_confirmation(bot, &ctx)
}

/// Envía el resumen de los datos y pasa a `CONFIRM_REGISTRATION`.
pub fn request_registration_confirmation(bot: &Bot, ctx: &ActorContext) -> Result<()> {
  let data = bot.state_store().get_data(ctx)?;
  let summary = messages::registration_summary(required(&data, keys::MUNICIPALITY_NAME)?,
                                               data.get_str(keys::ORGANIZATION_NAME),
                                               required(&data, keys::PHONE_NUMBER)?);
  request_confirmation(bot, ctx, &summary, CONFIRM_REGISTRATION)
}

pub fn confirm_registration(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  match handle_confirmation(&event.text) {
    Confirmation::Accepted => accept_registration(bot, &ctx),
    Confirmation::Rejected => {
      bot.send(&ctx, OutboundMessage::text(messages::REGISTRATION_REJECTED))?;
      restart_registration(bot, &ctx)
    }
    Confirmation::Invalid => {
      bot.send(&ctx, OutboundMessage::text(messages::INVALID_OPTION))?;
      request_registration_confirmation(bot, &ctx)
    }
  }
}

fn accept_registration(bot: &Bot, ctx: &ActorContext) -> Result<()> {
  // Una confirmación repetida tras un fallo de envío no crea otro donante.
  if let Some(donor) = bot.domain().find_donor_by_user_id(ctx.actor_id)? {
    log::warn!("el donante {} ya estaba guardado; se omite el alta", donor);
    bot.send(ctx, OutboundMessage::text(messages::REGISTRATION_SUCCEEDED))?;
    return home::send_home(bot, ctx);
  }

  let data = bot.state_store().get_data(ctx)?;
  let municipality_name = required(&data, keys::MUNICIPALITY_NAME)?;
  let municipality = match bot.domain().find_municipality_by_name(municipality_name)? {
    Some(m) => m,
    None => {
      log::warn!("la localidad '{}' desapareció antes de confirmar el registro de {}", municipality_name, ctx);
      bot.send(ctx, OutboundMessage::text(messages::MUNICIPALITY_GONE))?;
      return restart_registration(bot, ctx);
    }
  };
  let phone_number = parse_phone_number(required(&data, keys::PHONE_NUMBER)?).map_err(DomainError::from)?;
  let donor = Donor::new(ctx.actor_id,
                         required(&data, keys::DONOR_NAME)?,
                         phone_number,
                         data.get_str(keys::ORGANIZATION_NAME).map(str::to_string),
                         &municipality)?;
  bot.domain().save_donor(donor.clone())?;
  log::info!("nuevo donante registrado: {}", donor);

  bot.send(ctx, OutboundMessage::text(messages::REGISTRATION_SUCCEEDED))?;
  home::send_home(bot, ctx)
}

/// Borra lo acumulado (salvo el nombre del donante) y vuelve a pedir la
/// localidad.
fn restart_registration(bot: &Bot, ctx: &ActorContext) -> Result<()> {
  bot.state_store().merge_data(ctx,
                               DataPatch::new().clear(keys::PHONE_NUMBER)
                                               .clear(keys::MUNICIPALITY_NAME)
                                               .clear(keys::ORGANIZATION_NAME))?;
  request_municipality(bot, ctx)?;
  bot.state_store().set_state(ctx, SET_MUNICIPALITY)?;
  Ok(())
}

fn required<'a>(data: &'a StateData, key: &str) -> Result<&'a str> {
  data.get_str(key)
      .ok_or_else(|| FsmError::NotFound(format!("falta el dato '{}' del registro", key)).into())
}
