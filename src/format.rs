/*!

  A `Formatter` holds information about how to express a value as a string.
  Monoids, traces, and Foata forms are (potentially) formatted differently
  depending on the context: a human-readable UTF-8 form for interactive use,
  and a LaTeX form for notebooks. This needs to be distinct from Rust's
  standard `Display` trait, because `Display` gives no way to thread a choice
  of form through nested values; `Display` impls here just forward to the
  default form.

*/

use strum_macros::EnumString;


#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, Hash)]
pub enum DisplayForm {
  #[strum(serialize = "input")]
  Input,
  #[strum(serialize = "latex")]
  Latex,
}

impl Default for DisplayForm {
  fn default() -> DisplayForm {
    DisplayForm::Input
  }
}

/// Parameters used in methods that transform values into strings.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Formatter {
  pub form: DisplayForm,
}

impl From<DisplayForm> for Formatter {
  fn from(form: DisplayForm) -> Self {
    Formatter {
      form
    }
  }
}

pub trait Formattable {
  fn format(&self, formatter: &Formatter) -> String;
}


macro_rules! display_formattable_impl {
  ($type_name:ty) => {
    impl std::fmt::Display for $type_name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format(&$crate::format::Formatter::default()))
      }
    }
  }
}
