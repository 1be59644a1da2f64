//! # Energy Ledger Service
//!
//! Energy balances live in the account records (`energy`,
//! `energy_timestamp`). Allowances and contract masters live in the storage
//! of the ledger's own account, so they commit with the rest of the state.

use ec_01_account_state::{Account, AccountStateStore};
use shared_types::{keccak256_concat, to_hex, Address, BlockTime, Hash, U256};
use tracing::debug;

use crate::domain::{
    grown_energy, realize_energy, Consumption, ConsumptionAllowance, Debit, EnergyError,
    EnergyParams, RefusalReason,
};

const ALLOWANCE_KEY_PREFIX: &[u8] = b"consumption-allowance";
const MASTER_KEY_PREFIX: &[u8] = b"contract-master";

/// Storage slot of the allowance `contract` granted to `caller`.
pub fn allowance_key(contract: &Address, caller: &Address) -> Hash {
    keccak256_concat(&[ALLOWANCE_KEY_PREFIX, contract, caller])
}

/// Storage slot of `contract`'s master.
pub fn master_key(contract: &Address) -> Hash {
    keccak256_concat(&[MASTER_KEY_PREFIX, contract])
}

/// Energy ledger bound to one state session.
///
/// `address` is the ledger's own account, whose storage holds allowance and
/// master records.
pub struct Energy<'s, 'a> {
    address: Address,
    state: &'s mut AccountStateStore<'a>,
    params: EnergyParams,
}

impl<'s, 'a> Energy<'s, 'a> {
    /// Ledger with the protocol parameters.
    pub fn new(address: Address, state: &'s mut AccountStateStore<'a>) -> Self {
        Self {
            address,
            state,
            params: EnergyParams::default(),
        }
    }

    /// Ledger with custom parameters (test networks).
    pub fn with_params(
        address: Address,
        state: &'s mut AccountStateStore<'a>,
        params: EnergyParams,
    ) -> Result<Self, EnergyError> {
        params.validate()?;
        Ok(Self {
            address,
            state,
            params,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn params(&self) -> &EnergyParams {
        &self.params
    }

    // === Balances ===

    /// Energy of `address` at `now`, including growth since its last touch.
    pub fn balance(&mut self, now: BlockTime, address: &Address) -> Result<U256, EnergyError> {
        let account = self.state.account(address)?;
        Ok(grown_energy(&account, now, &self.params))
    }

    fn realized_account(&mut self, now: BlockTime, address: &Address) -> Result<Account, EnergyError> {
        let mut account = self.state.account(address)?;
        realize_energy(&mut account, now, &self.params);
        Ok(account)
    }

    /// Realize growth at `now`, then credit `amount`.
    pub fn add_balance(
        &mut self,
        now: BlockTime,
        address: &Address,
        amount: U256,
    ) -> Result<(), EnergyError> {
        let mut account = self.realized_account(now, address)?;
        account.energy = account.energy.saturating_add(amount);
        debug!(
            address = %to_hex(address),
            now,
            %amount,
            balance = %account.energy,
            "Energy added"
        );
        self.state.put_account(address, account)?;
        Ok(())
    }

    /// Realize growth at `now`, then debit `amount` if it is covered.
    ///
    /// A shortfall leaves the state untouched, growth included.
    pub fn sub_balance(
        &mut self,
        now: BlockTime,
        address: &Address,
        amount: U256,
    ) -> Result<Debit, EnergyError> {
        let mut account = self.realized_account(now, address)?;
        let Some(remaining) = account.energy.checked_sub(amount) else {
            debug!(
                address = %to_hex(address),
                now,
                required = %amount,
                available = %account.energy,
                "Energy debit refused"
            );
            return Ok(Debit::Insufficient {
                required: amount,
                available: account.energy,
            });
        };

        account.energy = remaining;
        self.state.put_account(address, account)?;
        debug!(address = %to_hex(address), now, %amount, %remaining, "Energy subtracted");
        Ok(Debit::Applied { remaining })
    }

    /// Set the primary balance of `address`.
    ///
    /// Growth up to `now` accrues at the old balance before the change.
    pub fn set_primary_balance(
        &mut self,
        now: BlockTime,
        address: &Address,
        balance: U256,
    ) -> Result<(), EnergyError> {
        let mut account = self.realized_account(now, address)?;
        account.balance = balance;
        self.state.put_account(address, account)?;
        debug!(address = %to_hex(address), now, %balance, "Primary balance set");
        Ok(())
    }

    // === Delegated consumption ===

    fn allowance(
        &mut self,
        contract: &Address,
        caller: &Address,
    ) -> Result<Option<ConsumptionAllowance>, EnergyError> {
        let raw = self
            .state
            .storage(&self.address, &allowance_key(contract, caller))?;
        if raw.is_empty() {
            return Ok(None);
        }
        ConsumptionAllowance::decode(&raw).map(Some)
    }

    fn put_allowance(
        &mut self,
        contract: &Address,
        caller: &Address,
        allowance: &ConsumptionAllowance,
    ) -> Result<(), EnergyError> {
        let encoded = allowance.encode()?;
        self.state
            .set_storage(&self.address, allowance_key(contract, caller), encoded)?;
        Ok(())
    }

    /// Let `caller` spend `contract`'s energy, replacing any earlier approval.
    pub fn approve_consumption(
        &mut self,
        now: BlockTime,
        contract: &Address,
        caller: &Address,
        credit: U256,
        recovery_rate: U256,
        expiration: BlockTime,
    ) -> Result<(), EnergyError> {
        let allowance = ConsumptionAllowance::new(credit, recovery_rate, now, expiration);
        self.put_allowance(contract, caller, &allowance)?;
        debug!(
            contract = %to_hex(contract),
            caller = %to_hex(caller),
            %credit,
            %recovery_rate,
            expiration,
            "Consumption approved"
        );
        Ok(())
    }

    /// Credit `caller` may spend from `contract` at `now`.
    ///
    /// Zero when never approved or expired. An expired record is left in
    /// place; only a new approval revives it.
    pub fn consumption_allowance(
        &mut self,
        now: BlockTime,
        contract: &Address,
        caller: &Address,
    ) -> Result<U256, EnergyError> {
        Ok(self
            .allowance(contract, caller)?
            .map(|allowance| allowance.remaining(now))
            .unwrap_or_default())
    }

    /// Charge `amount` to `contract` on behalf of `caller`.
    ///
    /// Succeeds only if both the allowance and the contract's energy cover
    /// the amount; otherwise nothing changes.
    pub fn consume(
        &mut self,
        now: BlockTime,
        contract: Option<&Address>,
        caller: &Address,
        amount: U256,
    ) -> Result<Consumption, EnergyError> {
        let Some(contract) = contract else {
            return Ok(self.refuse(None, caller, RefusalReason::NoContract));
        };

        let Some(allowance) = self.allowance(contract, caller)? else {
            return Ok(self.refuse(Some(contract), caller, RefusalReason::NoAllowance));
        };

        if allowance.is_expired(now) {
            let reason = RefusalReason::Expired {
                expiration: allowance.expiration,
            };
            return Ok(self.refuse(Some(contract), caller, reason));
        }

        let Some(updated) = allowance.consumed(now, amount) else {
            let reason = RefusalReason::AllowanceExceeded {
                allowance: allowance.remaining(now),
                required: amount,
            };
            return Ok(self.refuse(Some(contract), caller, reason));
        };

        match self.sub_balance(now, contract, amount)? {
            Debit::Applied { .. } => {
                self.put_allowance(contract, caller, &updated)?;
                debug!(
                    contract = %to_hex(contract),
                    caller = %to_hex(caller),
                    %amount,
                    credit_left = %updated.credit,
                    "Consumption paid by contract"
                );
                Ok(Consumption::Paid { payer: *contract })
            }
            Debit::Insufficient {
                required,
                available,
            } => {
                let reason = RefusalReason::InsufficientEnergy {
                    available,
                    required,
                };
                Ok(self.refuse(Some(contract), caller, reason))
            }
        }
    }

    fn refuse(
        &self,
        contract: Option<&Address>,
        caller: &Address,
        reason: RefusalReason,
    ) -> Consumption {
        debug!(
            contract = ?contract.map(|c| to_hex(c)),
            caller = %to_hex(caller),
            ?reason,
            "Consumption refused"
        );
        Consumption::Refused(reason)
    }

    // === Contract master ===

    /// Record `master` as the controlling account of `contract`.
    pub fn set_contract_master(
        &mut self,
        contract: &Address,
        master: &Address,
    ) -> Result<(), EnergyError> {
        self.state
            .set_storage(&self.address, master_key(contract), master.to_vec())?;
        Ok(())
    }

    /// The controlling account of `contract`, if one was set.
    pub fn contract_master(&mut self, contract: &Address) -> Result<Option<Address>, EnergyError> {
        let raw = self.state.storage(&self.address, &master_key(contract))?;
        if raw.is_empty() {
            return Ok(None);
        }
        let master: Address = raw
            .as_slice()
            .try_into()
            .map_err(|_| EnergyError::CorruptedRecord {
                kind: "contract master",
                reason: format!("expected 20 bytes, got {}", raw.len()),
            })?;
        Ok(Some(master))
    }
}

impl std::fmt::Debug for Energy<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Energy")
            .field("address", &to_hex(&self.address))
            .field("params", &self.params)
            .finish()
    }
}
