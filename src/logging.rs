/*!

Global control over diagnostic messaging. Messages are tagged with a channel
and a verbosity level; a message is only emitted when the global verbosity is
at least the message's level. Channel only affects how the message is
decorated.

*/

use std::sync::Mutex;

use lazy_static::lazy_static;
use strum_macros::Display;
use yansi::Paint;


#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Channel {
  Critical,
  Error,
  Warning,
  Notice,
  Debug,
}

lazy_static! {
  static ref VERBOSITY: Mutex<i32> = Mutex::new(0);
}

pub fn set_verbosity(new_value: i32) {
  *VERBOSITY.lock().unwrap() = new_value;
}

pub fn get_verbosity() -> i32 {
  *VERBOSITY.lock().unwrap()
}

fn verbosity_is_at_least(level: i32) -> bool {
  get_verbosity() >= level
}

/// Only emits the message if the global verbosity level is at least `level`.
pub(crate) fn log(channel: Channel, level: i32, message: &str) {
  if verbosity_is_at_least(level) {
    let label = match channel {
      Channel::Critical => Paint::red(channel).bold(),
      Channel::Error    => Paint::red(channel),
      Channel::Warning  => Paint::yellow(channel),
      Channel::Notice   => Paint::green(channel),
      Channel::Debug    => Paint::blue(channel),
    };
    println!("{}: {}", label, message);
  }
}
