use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::settings::Currency;

#[derive(Properties, PartialEq)]
pub struct SettingsBarProps {
    pub currency: Currency,
    pub on_currency: Callback<Currency>,
}

#[function_component(SettingsBar)]
pub fn settings_bar(props: &SettingsBarProps) -> Html {
    let current = props.currency;

    let on_change = {
        let on_currency = props.on_currency.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            if let Some(currency) = Currency::from_code(&select.value()) {
                on_currency.emit(currency);
            }
        })
    };

    html! {
        <label class="settings">
            <span>{"Měna"}</span>
            <select onchange={on_change}>
                { for Currency::ALL.iter().map(|c| html! {
                    <option value={c.code()} selected={*c == current}>{ c.code() }</option>
                }) }
            </select>
        </label>
    }
}
