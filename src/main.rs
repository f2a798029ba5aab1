use rozpocet_frontend::components::App;
use rozpocet_frontend::logging::{init_logging, log_directive_from_query};
use rozpocet_frontend::settings::DEFAULT_LOG_FILTER;

fn log_directive() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| log_directive_from_query(&search))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn main() {
    let directive = log_directive();
    if let Err(err) = init_logging(&directive).or_else(|_| init_logging(DEFAULT_LOG_FILTER)) {
        web_sys::console::warn_1(&err.to_string().into());
    }
    tracing::info!(filter = %directive, "starting budget visualizer");
    yew::Renderer::<App>::new().render();
}
