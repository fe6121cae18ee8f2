use relm4::{
    Component, ComponentParts, ComponentSender,
    gtk::{
        self,
        glib::clone,
        prelude::{BoxExt, OrientableExt},
    },
};

/// A dropdown over a replaceable list of string options, with a placeholder
/// row standing in for "nothing selected".
///
/// Replacing the options resets the selection back to the placeholder, so a
/// dependent dropdown can never keep a selection that belongs to options
/// fetched for a previous upstream value.
#[derive(Debug)]
pub struct OptionDropDown {
    dropdown: gtk::DropDown,
    placeholder: String,
    options: Vec<String>,
}

pub struct OptionDropDownInit {
    pub placeholder: String,
}

#[derive(Debug)]
pub enum OptionDropDownMsg {
    /// Replace the options and reset the selection to the placeholder
    SetOptions(Vec<String>),
    ClearSelection,
    SelectionChanged(u32),
}

#[derive(Debug)]
pub enum OptionDropDownOutputMsg {
    /// `None` means the placeholder row was selected
    SelectionChanged(Option<String>),
}

#[relm4::component(pub)]
impl Component for OptionDropDown {
    type Input = OptionDropDownMsg;
    type Output = OptionDropDownOutputMsg;
    type Init = OptionDropDownInit;
    type CommandOutput = ();

    view! {
        gtk::Box {
            set_orientation: gtk::Orientation::Horizontal,
            set_spacing: 6,

            #[local_ref]
            dropdown -> gtk::DropDown {},
        }
    }

    fn init(
        init_model: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let string_list = gtk::StringList::new(&[init_model.placeholder.as_str()]);
        let dropdown = gtk::DropDown::new(Some(string_list), None::<gtk::Expression>);
        dropdown.set_selected(0);
        dropdown.connect_selected_notify(clone!(
            #[strong]
            sender,
            move |dropdown| {
                sender.input(OptionDropDownMsg::SelectionChanged(dropdown.selected()));
            }
        ));

        let model = OptionDropDown {
            dropdown,
            placeholder: init_model.placeholder,
            options: Vec::new(),
        };

        let dropdown = &model.dropdown;
        let widgets = view_output!();
        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, _root: &Self::Root) {
        match msg {
            OptionDropDownMsg::SelectionChanged(index) => {
                // index 0 is the placeholder row
                let selected = if index == gtk::INVALID_LIST_POSITION || index == 0 {
                    None
                } else {
                    self.options.get(index as usize - 1).cloned()
                };
                tracing::debug!("Dropdown selection changed to {:?}", selected);
                sender
                    .output(OptionDropDownOutputMsg::SelectionChanged(selected))
                    .unwrap_or_else(|e| {
                        tracing::error!(error = ?e, "Failed to send output message");
                    });
            }
            OptionDropDownMsg::SetOptions(options) => {
                tracing::debug!("Replacing dropdown options with {} values", options.len());
                self.options = options;
                let mut rows: Vec<&str> = vec![self.placeholder.as_str()];
                rows.extend(self.options.iter().map(|s| s.as_str()));
                let string_list = gtk::StringList::new(&rows);
                self.dropdown.set_model(Some(&string_list));
                self.dropdown.set_selected(0);
            }
            OptionDropDownMsg::ClearSelection => {
                self.dropdown.set_selected(0);
            }
        }
    }
}
