//! Canned greeting and help replies.

use chrono::{Local, Timelike};

use rasoi_protocol::{AssistantReply, Intent};

use crate::handlers::day_part;

pub fn greeting() -> AssistantReply {
    let part = day_part(Local::now().hour());
    AssistantReply::plain(
        Intent::Greeting,
        format!("Good {part}! I'm your AI assistant. How can I help you today?"),
    )
}

pub fn help() -> AssistantReply {
    AssistantReply::plain(
        Intent::Help,
        "I can help you with:\n\n\
         **Menu Management:**\n\
         • \"Increase burger prices by ₹20\"\n\
         • \"Raise starters by 10%\"\n\
         • \"86 the paneer tikka\" (mark unavailable)\n\
         • \"Mark biryani available\"\n\n\
         **Sales & Analytics:**\n\
         • \"How's today going?\"\n\
         • \"What are the top sellers?\"\n\n\
         Just type naturally and I'll help!",
    )
}
