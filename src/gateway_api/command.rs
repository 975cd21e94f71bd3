use std::str::FromStr;

use crate::core::Error;

/// Gateway commands, sent as the `cmd` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    CreateTransaction,
    GetBasicInfo,
    Rates,
    Balances,
    GetDepositAddress,
    GetCallbackAddress,
    CreateTransfer,
    CreateWithdrawal,
    Convert,
    ConvertLimits,
    GetWithdrawalHistory,
    GetWithdrawalInfo,
    GetConversionInfo,
    GetTxInfo,
    GetTxInfoMulti,
    GetTxIds,
}

impl Command {
    pub const ALL: [Command; 16] = [
        Command::CreateTransaction,
        Command::GetBasicInfo,
        Command::Rates,
        Command::Balances,
        Command::GetDepositAddress,
        Command::GetCallbackAddress,
        Command::CreateTransfer,
        Command::CreateWithdrawal,
        Command::Convert,
        Command::ConvertLimits,
        Command::GetWithdrawalHistory,
        Command::GetWithdrawalInfo,
        Command::GetConversionInfo,
        Command::GetTxInfo,
        Command::GetTxInfoMulti,
        Command::GetTxIds,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::CreateTransaction => "create_transaction",
            Command::GetBasicInfo => "get_basic_info",
            Command::Rates => "rates",
            Command::Balances => "balances",
            Command::GetDepositAddress => "get_deposit_address",
            Command::GetCallbackAddress => "get_callback_address",
            Command::CreateTransfer => "create_transfer",
            Command::CreateWithdrawal => "create_withdrawal",
            Command::Convert => "convert",
            Command::ConvertLimits => "convert_limits",
            Command::GetWithdrawalHistory => "get_withdrawal_history",
            Command::GetWithdrawalInfo => "get_withdrawal_info",
            Command::GetConversionInfo => "get_conversion_info",
            Command::GetTxInfo => "get_tx_info",
            Command::GetTxInfoMulti => "get_tx_info_multi",
            Command::GetTxIds => "get_tx_ids",
        }
    }

    /// Commands that carry the configured callback URL as `ipn_url`.
    pub fn injects_ipn_url(&self) -> bool {
        matches!(self, Command::CreateTransaction | Command::GetCallbackAddress)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown gateway command: {}", s)))
    }
}
