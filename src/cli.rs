use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "send-sms", version)]
#[command(about = "Send a single SMS via the Twilio REST API", long_about = None)]
#[command(after_help = "Credentials default to the TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and \
TWILIO_FROM environment variables. Prefer the environment over passing secrets on the command line.")]
pub struct Cli {
    /// Recipient phone number in E.164 format, e.g. +14155552671
    #[arg(long, value_name = "NUMBER")]
    pub to: Option<String>,

    /// Message body (text)
    #[arg(long, value_name = "TEXT")]
    pub body: Option<String>,

    /// Twilio Account SID (defaults to TWILIO_ACCOUNT_SID)
    #[arg(long, value_name = "SID")]
    pub account_sid: Option<String>,

    /// Twilio Auth Token (defaults to TWILIO_AUTH_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub auth_token: Option<String>,

    /// Sending Twilio number (defaults to TWILIO_FROM)
    #[arg(long = "from", value_name = "NUMBER")]
    pub from_number: Option<String>,

    /// Also print the provider's raw JSON response
    #[arg(long)]
    pub raw: bool,

    /// Verbose logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
