use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::{CategoryBlock, DonutChart, Legend, SettingsBar, SummaryPanel};
use crate::controller::{Action, BrowserDialogs, Command, Controller};
use crate::settings::{change_currency, load_settings, Currency, Settings};
use crate::storage::BrowserStorage;

type BrowserController = Controller<BrowserStorage, BrowserDialogs>;

#[function_component(App)]
pub fn app() -> Html {
    let controller = use_mut_ref(|| BrowserController::load(BrowserStorage, BrowserDialogs));
    let settings = use_state(|| load_settings(&BrowserStorage));
    // Bumped after every state change to re-render from the controller.
    let revision = use_state(|| 0u64);

    let on_command = {
        let controller = controller.clone();
        let revision = revision.clone();
        Callback::from(move |command: Command| {
            let changed = controller.borrow_mut().handle(command);
            if changed {
                revision.set(revision.wrapping_add(1));
            }
        })
    };

    let on_income = {
        let on_command = on_command.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_command.emit(Command::Apply(Action::SetIncome(input.value())));
            }
        })
    };

    let on_add_category = {
        let on_command = on_command.clone();
        Callback::from(move |_: MouseEvent| on_command.emit(Command::AddCategory))
    };

    let on_currency = {
        let settings = settings.clone();
        Callback::from(move |currency: Currency| {
            if let Some(next) = change_currency(&BrowserStorage, &settings, currency) {
                settings.set(next);
            }
        })
    };

    let on_reset = {
        let on_command = on_command.clone();
        Callback::from(move |_: MouseEvent| on_command.emit(Command::Reset))
    };

    let currency = settings.currency;
    let controller = controller.borrow();
    let state = controller.state();
    let breakdown = controller.breakdown().clone();

    html! {
        <ContextProvider<UseStateHandle<Settings>> context={settings}>
            <div class="app">
                <header class="topbar">
                    <h1>{"Rozpočet"}</h1>
                    <div class="topbar-actions">
                        <SettingsBar currency={currency} on_currency={on_currency} />
                        <button id="btnReset" class="danger" onclick={on_reset}>{"Vymazat vše"}</button>
                    </div>
                </header>
                <main class="layout">
                    <section class="panel inputs">
                        <label class="income">
                            <span>{"Měsíční příjem"}</span>
                            <input
                                id="prijem"
                                type="text"
                                inputmode="decimal"
                                placeholder="0"
                                value={state.income.clone()}
                                oninput={on_income}
                            />
                        </label>
                        <div id="categories">
                            { for state.categories.iter().map(|category| html! {
                                <CategoryBlock
                                    key={category.id.clone()}
                                    category={category.clone()}
                                    on_command={on_command.clone()}
                                />
                            }) }
                        </div>
                        <button id="addCategory" class="primary" onclick={on_add_category}>{"➕ Přidat kategorii"}</button>
                    </section>
                    <section class="panel chart">
                        <DonutChart breakdown={breakdown.clone()} />
                        <Legend breakdown={breakdown.clone()} />
                        <SummaryPanel breakdown={breakdown} />
                    </section>
                </main>
            </div>
        </ContextProvider<UseStateHandle<Settings>>>
    }
}
