use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::use_currency;
use crate::controller::{Action, Command};
use crate::format::format_currency;
use crate::model::{Amount, Category, Item};

#[derive(Properties, PartialEq)]
pub struct CategoryBlockProps {
    pub category: Category,
    pub on_command: Callback<Command>,
}

#[function_component(CategoryBlock)]
pub fn category_block(props: &CategoryBlockProps) -> Html {
    let currency = use_currency();
    let editing = use_state(|| false);
    let input_ref = use_node_ref();

    {
        let input_ref = input_ref.clone();
        use_effect_with_deps(
            move |editing| {
                if *editing {
                    if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                        let _ = input.focus();
                        input.select();
                    }
                }
                || ()
            },
            *editing,
        );
    }

    let category = &props.category;
    let id = category.id.clone();

    let on_edit = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(true))
    };

    // Blur also fires after Enter/Escape; a repeated rename to the same name is a no-op.
    let commit = {
        let editing = editing.clone();
        let on_command = props.on_command.clone();
        let id = id.clone();
        Callback::from(move |name: String| {
            editing.set(false);
            on_command.emit(Command::Apply(Action::RenameCategory {
                id: id.clone(),
                name,
            }));
        })
    };

    let on_keydown = {
        let commit = commit.clone();
        let prior = category.name.clone();
        Callback::from(move |e: KeyboardEvent| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if let Some(name) = rename_outcome(&e.key(), &input.value(), &prior) {
                input.set_value(&name);
                commit.emit(name);
            }
        })
    };

    let on_blur = {
        let commit = commit.clone();
        Callback::from(move |e: FocusEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                commit.emit(input.value());
            }
        })
    };

    let on_add_item = {
        let on_command = props.on_command.clone();
        let id = id.clone();
        Callback::from(move |_: MouseEvent| on_command.emit(Command::Apply(Action::AddItem(id.clone()))))
    };

    let on_delete = {
        let on_command = props.on_command.clone();
        let id = id.clone();
        Callback::from(move |_: MouseEvent| on_command.emit(Command::DeleteCategory(id.clone())))
    };

    let title = if *editing {
        html! {
            <input
                ref={input_ref}
                type="text"
                class="edit-input"
                value={category.name.clone()}
                onkeydown={on_keydown}
                onblur={on_blur}
            />
        }
    } else {
        html! { <span class="cat-name" style={format!("border-color:{}", category.color)}>{ category.name.clone() }</span> }
    };

    let body = match &category.amount {
        Amount::Direct(value) => {
            let on_input = {
                let on_command = props.on_command.clone();
                let id = id.clone();
                Callback::from(move |e: InputEvent| {
                    if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                        on_command.emit(Command::Apply(Action::SetCategoryValue {
                            id: id.clone(),
                            value: input.value(),
                        }));
                    }
                })
            };
            html! {
                <div class="value-row">
                    <input type="text" inputmode="decimal" placeholder="0" value={value.clone()} oninput={on_input} />
                </div>
            }
        }
        Amount::Itemized(items) => html! {
            <div class="items">
                { for items.iter().map(|item| html! {
                    <ItemRow
                        key={item.id.clone()}
                        category_id={id.clone()}
                        item={item.clone()}
                        on_command={props.on_command.clone()}
                    />
                }) }
                <p class="cat-total">{ format_currency(category.total(), currency) }</p>
            </div>
        },
    };

    html! {
        <div class="category-block" data-cat-id={id.clone()}>
            <div class="cat-header">
                { title }
                <div class="cat-actions">
                    <button class="edit" title="Přejmenovat" onclick={on_edit}>{"✏️"}</button>
                    <button class="add-item" title="Přidat položku" onclick={on_add_item}>{"➕ Položka"}</button>
                    <button class="del" title="Smazat kategorii" onclick={on_delete}>{"✕"}</button>
                </div>
            </div>
            { body }
        </div>
    }
}

/// Name to commit for a key pressed while renaming: Enter keeps what was typed,
/// Escape restores `prior`, anything else keeps editing.
fn rename_outcome(key: &str, typed: &str, prior: &str) -> Option<String> {
    match key {
        "Enter" => Some(typed.to_string()),
        "Escape" => Some(prior.to_string()),
        _ => None,
    }
}

#[derive(Properties, PartialEq)]
pub struct ItemRowProps {
    pub category_id: String,
    pub item: Item,
    pub on_command: Callback<Command>,
}

#[function_component(ItemRow)]
pub fn item_row(props: &ItemRowProps) -> Html {
    let on_name = {
        let on_command = props.on_command.clone();
        let category_id = props.category_id.clone();
        let item_id = props.item.id.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_command.emit(Command::Apply(Action::SetItemName {
                    category_id: category_id.clone(),
                    item_id: item_id.clone(),
                    name: input.value(),
                }));
            }
        })
    };

    let on_value = {
        let on_command = props.on_command.clone();
        let category_id = props.category_id.clone();
        let item_id = props.item.id.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_command.emit(Command::Apply(Action::SetItemValue {
                    category_id: category_id.clone(),
                    item_id: item_id.clone(),
                    value: input.value(),
                }));
            }
        })
    };

    let on_delete = {
        let on_command = props.on_command.clone();
        let category_id = props.category_id.clone();
        let item_id = props.item.id.clone();
        Callback::from(move |_: MouseEvent| {
            on_command.emit(Command::DeleteItem {
                category_id: category_id.clone(),
                item_id: item_id.clone(),
            })
        })
    };

    html! {
        <div class="item-row" data-item-id={props.item.id.clone()}>
            <input type="text" placeholder="Název položky" value={props.item.name.clone()} oninput={on_name} />
            <input type="text" inputmode="decimal" placeholder="0" value={props.item.value.clone()} oninput={on_value} />
            <button class="del-item" onclick={on_delete}>{"✕"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::rename_outcome;

    #[test]
    fn enter_commits_the_typed_name() {
        assert_eq!(rename_outcome("Enter", "Bydlení", "Nájem"), Some("Bydlení".to_string()));
    }

    #[test]
    fn escape_reverts_to_the_prior_name() {
        assert_eq!(rename_outcome("Escape", "Bydl", "Nájem"), Some("Nájem".to_string()));
    }

    #[test]
    fn other_keys_keep_editing() {
        for key in ["a", "Tab", "Backspace", "ArrowLeft"] {
            assert_eq!(rename_outcome(key, "Bydl", "Nájem"), None);
        }
    }
}
