//! Parent/child echo demo
//!
//! `App` owns a text state and renders an `Input` child, passing the text down
//! as `value` and an `on_change` callback that upper-cases whatever is typed.
//! The demo "types" a few strings and prints what the input paints.
//!
//! Run with `RUST_LOG=statewise_component=debug` to see the update flow.

use statewise::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Input {
	painted: String,
}

impl Component for Input {
	fn render(&mut self, cx: &Context<Self>) {
		self.painted = cx.prop().get_as::<String>("value").unwrap_or_default();
		println!("input shows {:?}", self.painted);
	}

	fn on_update(&mut self, cx: &Context<Self>, _: &PreviousValues, previous_prop: &PreviousValues) {
		if has_some_prop(previous_prop, &["value"]) {
			let previous = previous_prop.get("value").cloned().unwrap_or_default();
			let current = cx.prop().get("value").cloned().unwrap_or_default();
			println!("input value changed to {current:?} from {previous:?}");
		}
	}
}

#[derive(Default)]
struct App {
	input: Option<ComponentHandle<Input>>,
	on_change: Option<Callback>,
}

impl Component for App {
	fn render(&mut self, cx: &Context<Self>) {
		let text = cx.state().get_as::<String>("text").unwrap_or_default();
		let on_change = self
			.on_change
			.get_or_insert_with(|| {
				cx.handle().callback(|app, value| {
					app.set_state([("text", value.to_string().to_uppercase())]);
				})
			})
			.clone();

		match &self.input {
			Some(input) => {
				if let Err(err) = input.set_prop(values! { "value" => text, "on_change" => on_change }) {
					tracing::warn!(%err, "input was not updated");
				}
			}
			None => {
				self.input = Some(ComponentHandle::with_props(
					Input::default(),
					State::new(),
					Props::from_iter([
						("value", Value::from(text)),
						("on_change", Value::from(on_change)),
					]),
				));
			}
		}
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let app = ComponentHandle::new(App::default(), State::from_iter([("text", "")]));
	run_until_idle()?;

	let input = app
		.with_component(|app| app.input.clone())?
		.ok_or("app did not render its input")?;

	for typed in ["h", "he", "hello", "HELLO"] {
		println!("typing {typed:?}");
		input.prop().get_as::<Callback>("on_change")?.call(typed);
		run_until_idle()?;
	}

	println!("app rendered {} times", app.render_count());
	Ok(())
}
