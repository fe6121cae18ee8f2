pub mod option_drop_down;

pub use option_drop_down::{
    OptionDropDown, OptionDropDownInit, OptionDropDownMsg, OptionDropDownOutputMsg,
};
