//! User-facing prompt texts and their quick-reply keyboards. All texts are
//! Russian, matching the audience of the household sheet.

use crate::domain::choices::{Category, Payer, PaymentMethod};
use crate::flow::states::Reply;

pub const CHOICE_ENTER_DATE: &str = "Указать дату";
pub const CHOICE_TODAY: &str = "Сегодня";
pub const CHOICE_PICK_METHOD: &str = "Выбрать способ оплаты";
pub const CHOICE_SKIP_METHOD: &str = "Указать место покупки";

pub fn amount_prompt() -> Reply {
    Reply::text("Введите сумму трат:")
}

pub fn invalid_amount() -> Reply {
    Reply::text("Пожалуйста, введите корректное число.")
}

pub fn date_choice_prompt() -> Reply {
    Reply::with_choices("Выберите опцию:", &[CHOICE_ENTER_DATE, CHOICE_TODAY])
}

pub fn date_value_prompt() -> Reply {
    Reply::text("Введите дату в формате ддмм:")
}

pub fn invalid_date(reason: &str) -> Reply {
    Reply::text(format!("Дата не распознана: {reason}. Введите дату в формате ддмм:"))
}

pub fn payer_prompt() -> Reply {
    let labels = Payer::ALL.map(|payer| payer.label());
    Reply::with_choices("Выберите плательщика:", &labels)
}

pub fn payment_choice_prompt() -> Reply {
    Reply::with_choices("Выберите опцию:", &[CHOICE_PICK_METHOD, CHOICE_SKIP_METHOD])
}

pub fn payment_method_prompt() -> Reply {
    let labels = PaymentMethod::ALL.map(|method| method.label());
    Reply::with_choices("Выберите способ оплаты:", &labels)
}

pub fn place_prompt() -> Reply {
    Reply::text("Введите место покупки:")
}

pub fn invalid_place() -> Reply {
    Reply::text("Место покупки не может быть пустым. Введите место покупки:")
}

pub fn category_prompt() -> Reply {
    let labels = Category::ALL.map(|category| category.label());
    Reply::with_choices("Выберите категорию трат:", &labels)
}

/// Re-issues the same keyboard with a short diagnostic instead of advancing.
pub fn choice_reprompt(original: &Reply) -> Reply {
    Reply {
        text: "Пожалуйста, выберите один из предложенных вариантов.".to_string(),
        choice_rows: original.choice_rows.clone(),
    }
}

pub fn saved_notice() -> Reply {
    Reply::text("Трата успешно добавлена!")
}

pub fn cancel_notice() -> Reply {
    Reply::text("Отмена операции.")
}

pub fn persist_failed_notice() -> Reply {
    Reply::text(
        "Не удалось сохранить трату. Отправьте любое сообщение, чтобы повторить попытку, \
         или /cancel для отмены.",
    )
}

#[cfg(test)]
mod tests {
    use super::{category_prompt, choice_reprompt, date_choice_prompt, payer_prompt};

    #[test]
    fn payer_keyboard_fits_one_row() {
        assert_eq!(payer_prompt().choice_rows.len(), 1);
        assert_eq!(payer_prompt().choice_rows[0], vec!["Ринат", "Коля", "Nicolas"]);
    }

    #[test]
    fn category_keyboard_spans_four_rows_of_three() {
        let rows = category_prompt().choice_rows;
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.len() == 3));
        assert_eq!(rows[0][0], "Транспорт");
        assert_eq!(rows[3][2], "Спорт");
    }

    #[test]
    fn reprompt_preserves_the_keyboard() {
        let original = date_choice_prompt();
        let reprompt = choice_reprompt(&original);
        assert_eq!(reprompt.choice_rows, original.choice_rows);
        assert_ne!(reprompt.text, original.text);
    }
}
