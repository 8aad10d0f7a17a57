//! Reply keyboard rendering: core choice rows become a one-time
//! `ReplyKeyboardMarkup`, plain replies remove any previous keyboard.

use serde::Serialize;

use traty_core::Reply;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard(ReplyKeyboardMarkup),
    Remove(ReplyKeyboardRemove),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub one_time_keyboard: bool,
    pub resize_keyboard: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
}

pub fn markup_for(reply: &Reply) -> ReplyMarkup {
    if !reply.has_choices() {
        return ReplyMarkup::Remove(ReplyKeyboardRemove { remove_keyboard: true });
    }

    let keyboard = reply
        .choice_rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton { text: label.clone() }).collect())
        .collect();

    ReplyMarkup::Keyboard(ReplyKeyboardMarkup {
        keyboard,
        one_time_keyboard: true,
        resize_keyboard: true,
    })
}
