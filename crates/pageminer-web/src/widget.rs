//! Language switcher dropdown rendered into the navbar.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use pageminer_i18n::SwitchOutcome;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Node};

use crate::app::SharedPage;
use crate::browser::describe;
use crate::switcher::{
    ARROW, ARROW_CLASS, CURRENT_CLASS, FLAG_CLASS, LANG_ATTRIBUTE, NAME_CLASS, NAVBAR_SELECTOR,
    SWITCHER_CLASS, SwitcherModel, SwitcherOption,
};

struct SwitcherView {
    root: Element,
    current_flag: Element,
    current_name: Element,
    dropdown: Element,
    options: Vec<Element>,
}

impl SwitcherView {
    fn render(document: &web_sys::Document, model: &SwitcherModel) -> Result<Self, JsValue> {
        let root = element(document, "div", SWITCHER_CLASS)?;

        let header = element(document, "div", CURRENT_CLASS)?;
        let current_flag = element(document, "span", FLAG_CLASS)?;
        let current_name = element(document, "span", NAME_CLASS)?;
        let arrow = element(document, "span", ARROW_CLASS)?;
        arrow.set_text_content(Some(ARROW));
        header.append_child(&current_flag)?;
        header.append_child(&current_name)?;
        header.append_child(&arrow)?;

        let dropdown = element(document, "div", &model.dropdown_class())?;
        let mut options = Vec::with_capacity(model.options().len());
        for option in model.options() {
            let item = option_element(document, option)?;
            dropdown.append_child(&item)?;
            options.push(item);
        }

        root.append_child(&header)?;
        root.append_child(&dropdown)?;

        let view = Self {
            root,
            current_flag,
            current_name,
            dropdown,
            options,
        };
        view.refresh(model);
        Ok(view)
    }

    fn refresh(&self, model: &SwitcherModel) {
        if let Some(current) = model.current() {
            self.current_flag.set_text_content(Some(current.flag));
            self.current_name.set_text_content(Some(&current.label));
        }
        self.dropdown.set_class_name(&model.dropdown_class());
        for (element, option) in self.options.iter().zip(model.options()) {
            element.set_class_name(&option.class_name());
        }
    }
}

/// Build the switcher, append it to the navbar, and wire its handlers.
///
/// Pages without a navbar get no switcher.
pub(crate) fn install(page: &SharedPage) {
    let document = gloo::utils::document();
    let Ok(Some(navbar)) = document.query_selector(NAVBAR_SELECTOR) else {
        console::debug!("navbar not found; language switcher skipped");
        return;
    };
    let Ok(mut state) = page.try_borrow_mut() else {
        console::warn!("page busy; language switcher skipped");
        return;
    };

    let model = SwitcherModel::from_localizer(state.localizer());
    let view = match SwitcherView::render(&document, &model) {
        Ok(view) => Rc::new(view),
        Err(err) => {
            console::error!("failed to render language switcher", describe(&err));
            return;
        }
    };
    if let Err(err) = navbar.append_child(&view.root) {
        console::error!("failed to mount language switcher", describe(&err));
        return;
    }
    let model = Rc::new(RefCell::new(model));

    // Switches made through the JS handle update the header as well.
    {
        let model = Rc::clone(&model);
        let view = Rc::clone(&view);
        state.localizer_mut().subscribe(move |event| {
            let mut model = model.borrow_mut();
            model.select(event.locale.as_str());
            view.refresh(&model);
        });
    }
    drop(state);

    if let Ok(Some(header)) = view.root.query_selector(&format!(".{CURRENT_CLASS}")) {
        let model = Rc::clone(&model);
        let view = Rc::clone(&view);
        EventListener::new(&header, "click", move |_event| {
            let mut model = model.borrow_mut();
            model.toggle();
            view.refresh(&model);
        })
        .forget();
    }

    for (element, option) in view.options.iter().zip(model.borrow().options()) {
        let code = option.code.clone();
        let page = Rc::clone(page);
        let model = Rc::clone(&model);
        let view = Rc::clone(&view);
        EventListener::new(element, "click", move |_event| {
            let outcome = match page.try_borrow_mut() {
                Ok(mut state) => state.switch(&code),
                Err(_) => {
                    console::warn!("page busy; locale switch ignored", code.clone());
                    SwitchOutcome::Rejected
                }
            };
            let mut model = model.borrow_mut();
            if outcome != SwitchOutcome::Rejected {
                model.select(&code);
            }
            model.close();
            view.refresh(&model);
        })
        .forget();
    }

    let outside = {
        let model = Rc::clone(&model);
        let view = Rc::clone(&view);
        move |event: &web_sys::Event| {
            let inside = event
                .target()
                .and_then(|target| target.dyn_into::<Node>().ok())
                .is_some_and(|node| view.root.contains(Some(&node)));
            if !inside {
                let mut model = model.borrow_mut();
                model.close();
                view.refresh(&model);
            }
        }
    };
    EventListener::new(&document, "click", outside).forget();
}

fn option_element(
    document: &web_sys::Document,
    option: &SwitcherOption,
) -> Result<Element, JsValue> {
    let item = element(document, "div", &option.class_name())?;
    item.set_attribute(LANG_ATTRIBUTE, &option.code)?;
    let flag = element(document, "span", FLAG_CLASS)?;
    flag.set_text_content(Some(option.flag));
    let name = element(document, "span", NAME_CLASS)?;
    name.set_text_content(Some(&option.label));
    item.append_child(&flag)?;
    item.append_child(&name)?;
    Ok(item)
}

fn element(document: &web_sys::Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}
