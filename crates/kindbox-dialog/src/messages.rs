// Textos que ve el usuario. Los que dependen de datos se arman con
// funciones; el resto son constantes.

pub const TRY_AGAIN: &str = "Попробуй еще раз.";
pub const INVALID_OPTION: &str = "Пожалуйста, выбери один из вариантов на клавиатуре.";

pub const REQUEST_MUNICIPALITY: &str = "Выбери населенный пункт, в котором ты будешь принимать участие в акции:";
pub const UNKNOWN_MUNICIPALITY: &str =
  "Этот город не участвует в акции! Пожалуйста, выбери название города с помощью клавиатуры.";
pub const REQUEST_SELF_OR_ORG: &str = "Ты будешь участвовать в акции от своего имени или от имени организации?";
pub const REQUEST_ORGANIZATION_NAME: &str = "Хорошо. Тогда напиши, пожалуйста, название этой организации.";
pub const REQUEST_PHONE_NUMBER: &str = "Отлично! Теперь, пожалуйста, отправь номер телефона по которому, в случае \
                                        чего, волонтеры смогли бы с тобой связаться.";
pub const REGISTRATION_SUCCEEDED: &str = "😺 Чудесно! Регистрация на акцию пройдена успешно.";
pub const REGISTRATION_REJECTED: &str = "🤔 Что-ж, давай попробуем сначала. Будь внимательней в этот раз!)";
pub const MUNICIPALITY_GONE: &str =
  "Похоже, выбранный населенный пункт больше не участвует в акции. Давай выберем его заново.";
pub const HOME: &str = "Главное меню. Выбери, что хочешь сделать:";

pub fn welcome(first_name: &str, deadline: &str) -> String {
  format!("👋 Привет, {}! Я бот для проведения акции <<Коробочка доброты>>.\n\n\
           С моей помощью ты сможешь выбрать одного или нескольких человек с ограниченными возможностями, \
           которым будешь дарить подарок.\n\n\
           Обрати внимание, что выбранные подарки будет необходимо принести на точку сбора до {}.\n\n\
           Но, для начала, мне нужно узнать некоторую информацию о тебе.",
          first_name, deadline)
}

pub fn organization_name_too_long() -> String {
  format!("Слишком длинное название организации. {}", TRY_AGAIN)
}

pub fn not_a_phone_number() -> String {
  format!("Эээ... Это что-то не очень похоже на номер телефона. {}", TRY_AGAIN)
}

pub fn registration_summary(municipality_name: &str, organization_name: Option<&str>, phone_number: &str) -> String {
  let mut text = format!("Давай проверим данные:\n- Населенный пункт: {}\n", municipality_name);
  match organization_name {
    Some(org) if !org.is_empty() => text.push_str(&format!("- Организация: <<{}>>\n", org)),
    _ => text.push_str("- Участвуешь в акции не от имени организации\n"),
  }
  text.push_str(&format!("- Контактный номер телефона: {}\n\nВсе верно?", phone_number));
  text
}

pub fn gifts_info(deadline: &str) -> String {
  format!("Подарки нужно принести на точку сбора в своем населенном пункте до {}. \
           Адрес и время работы точки сбора сообщат волонтеры.",
          deadline)
}
