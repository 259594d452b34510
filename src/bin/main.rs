//! Tokenlaunch CLI - offline calldata work and node lookups
//!
//! Calldata:
//!   tokenlaunch calldata --name Moon --symbol MOON --supply 21000000 --to <key>
//!   tokenlaunch factory-calldata --name Moon --symbol MOON --supply 1000 --to <key> --burnable
//!   tokenlaunch decode <hex>
//!
//! Display helpers:
//!   tokenlaunch preview --name Moon --symbol MOON --mintable
//!   tokenlaunch estimate --network testnet --mintable --pausable
//!   tokenlaunch networks
//!
//! Node (JSON-RPC):
//!   tokenlaunch lookup <bitcoin-address> --network regtest
//!   tokenlaunch simulate --factory <addr> --to <key> --name Moon --symbol MOON --supply 1000
//!   tokenlaunch artifact [path-or-url]
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::env;
use std::io::IsTerminal;
use tracing::debug;

use tokenlaunch::abi::factory::DEPLOY_TOKEN_SIGNATURE;
use tokenlaunch::abi::{selector, token, DeployTokenArgs, TokenCall, TokenInit};
use tokenlaunch::core::network::group_thousands;
use tokenlaunch::deploy::{ArtifactLocation, CostEstimate, DeployForm, TokenPreview};
use tokenlaunch::launcher::{load_dotenv, LauncherConfig};
use tokenlaunch::logging::init_logging;
use tokenlaunch::rpc::{ContractCall, JsonRpcConnector, RpcConnector, RpcProvider};
use tokenlaunch::{Address, Network};

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);
    init_logging();

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("tokenlaunch {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("calldata") => cmd_calldata(&opts),
        Some("factory-calldata") => cmd_factory_calldata(&opts),
        Some("decode") => cmd_decode(&opts),
        Some("preview") => cmd_preview(&opts),
        Some("estimate") => cmd_estimate(&opts),
        Some("networks") => cmd_networks(),
        Some("lookup") => cmd_lookup(&opts),
        Some("simulate") => cmd_simulate(&opts),
        Some("artifact") => cmd_artifact(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    target: Option<String>,
    // Token fields
    name: Option<String>,
    symbol: Option<String>,
    supply: Option<String>,
    decimals: Option<String>,
    to: Option<String>,
    mint: Option<String>,
    free_mint_supply: Option<String>,
    free_mint_per_tx: Option<String>,
    free_mint_user_cap: Option<String>,
    mintable: bool,
    burnable: bool,
    pausable: bool,
    // Network options
    network: Option<String>,
    rpc_url: Option<String>,
    factory: Option<String>,
    artifact: Option<String>,
    // Output options
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        load_dotenv(".env");

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1).cloned();
            let mut takes_value = true;
            match arg.as_str() {
                "--name" => opts.name = value,
                "--symbol" => opts.symbol = value,
                "--supply" => opts.supply = value,
                "--decimals" | "-d" => opts.decimals = value,
                "--to" => opts.to = value,
                "--mint" => opts.mint = value,
                "--free-mint-supply" => opts.free_mint_supply = value,
                "--free-mint-per-tx" => opts.free_mint_per_tx = value,
                "--free-mint-user-cap" => opts.free_mint_user_cap = value,
                "--network" | "-n" => opts.network = value,
                "--rpc" => opts.rpc_url = value,
                "--factory" => opts.factory = value,
                "--artifact" => opts.artifact = value,
                _ => {
                    takes_value = false;
                    match arg.as_str() {
                        "--help" | "-h" => opts.help = true,
                        "--version" | "-V" => opts.version = true,
                        "--json" => opts.json = true,
                        "--pretty" => opts.pretty = true,
                        "--mintable" => opts.mintable = true,
                        "--burnable" => opts.burnable = true,
                        "--pausable" => opts.pausable = true,
                        _ if !arg.starts_with('-') => positional.push(arg.clone()),
                        _ => {} // Ignore unknown flags
                    }
                }
            }
            i += if takes_value { 2 } else { 1 };
        }

        // First positional is command, second its target
        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        if !positional.is_empty() {
            opts.target = Some(positional.remove(0));
        }
        opts
    }

    fn form(&self) -> DeployForm {
        let mut form = DeployForm::new(
            self.name.as_deref().unwrap_or_default(),
            self.symbol.as_deref().unwrap_or_default(),
            self.supply.as_deref().unwrap_or_default(),
        );
        if let Some(decimals) = &self.decimals {
            form.decimals = decimals.clone();
        }
        form.initial_mint = self.mint.clone().unwrap_or_default();
        form.free_mint_supply = self.free_mint_supply.clone().unwrap_or_default();
        form.free_mint_per_tx = self.free_mint_per_tx.clone().unwrap_or_default();
        form.free_mint_user_cap = self.free_mint_user_cap.clone().unwrap_or_default();
        form.mintable = self.mintable;
        form.burnable = self.burnable;
        form.pausable = self.pausable;
        form
    }

    fn network(&self) -> Result<Network, String> {
        match self.network.as_deref() {
            Some(name) => Network::from_name(name).ok_or_else(|| format!("Unknown network: {}", name)),
            None => Ok(Network::default()),
        }
    }

    fn recipient(&self) -> Result<Address, String> {
        let to = self.to.as_deref().ok_or("--to <hex key or address> is required")?;
        Address::from_hex(to).map_err(|e| format!("Invalid --to: {}", e))
    }

    fn config(&self) -> LauncherConfig {
        let mut config = LauncherConfig::from_env();
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url.clone());
        }
        if let Some(factory) = &self.factory {
            config = config.with_factory(factory.clone());
        }
        if let Some(artifact) = &self.artifact {
            config = config.with_default_artifact(ArtifactLocation::parse(artifact));
        }
        config
    }
}

fn print_usage() {
    println!(
        r#"tokenlaunch - OP-20 token deployer for OP_NET

USAGE:
    tokenlaunch <command> [target] [options]

COMMANDS:
    calldata                Encode the token constructor payload
    factory-calldata        Encode a factory deployToken call
    decode <hex>            Decode constructor, deployToken, mint or burn calldata
    preview                 Token preview line
    estimate                Deployment cost breakdown
    networks                Supported networks
    lookup <address>        Resolve a Bitcoin address to its OP_NET key
    simulate                Dry-run deployToken against the factory
    artifact [location]     Load the contract artifact and report its digest

TOKEN OPTIONS:
    --name <name>           Token name
    --symbol <symbol>       Token symbol
    --supply <n>            Max supply in whole tokens
    --decimals, -d <n>      Decimals (default: 18)
    --mint <n>              Initial mint in whole tokens (default: supply)
    --to <key>              Initial mint recipient / sender (hex key or 32-byte address)
    --free-mint-supply <n>  Factory free-mint pool
    --free-mint-per-tx <n>  Factory free-mint per transaction
    --free-mint-user-cap <n> Factory free-mint cap per user
    --mintable              Mark as mintable (preview/estimate)
    --burnable              Enable burning
    --pausable              Mark as pausable (preview/estimate)

NETWORK OPTIONS:
    --network, -n <net>     mainnet|testnet|regtest (default: regtest)
    --rpc <url>             RPC endpoint (env: TOKENLAUNCH_RPC_URL)
    --factory <addr>        Factory contract (env: TOKENLAUNCH_FACTORY)
    --artifact <loc>        Contract artifact path or URL (env: TOKENLAUNCH_ARTIFACT)

OUTPUT OPTIONS:
    --json                  Raw JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

EXAMPLES:
    tokenlaunch calldata --name Moon --symbol MOON --supply 21000000 --to 0x02ab...
    tokenlaunch decode 0000...
    tokenlaunch estimate --network testnet --mintable
    tokenlaunch lookup bcrt1q... --network regtest --json | jq .p2op
"#
    );
}

fn token_init_json(init: &TokenInit) -> Value {
    json!({
        "maxSupply": init.max_supply.to_string(),
        "decimals": init.decimals,
        "name": init.name,
        "symbol": init.symbol,
        "initialMintTo": init.initial_mint_to.to_hex(),
        "initialMintAmount": init.initial_mint_amount.to_string(),
    })
}

fn factory_args_json(args: &DeployTokenArgs) -> Value {
    json!({
        "maxSupply": args.max_supply.to_string(),
        "decimals": args.decimals,
        "name": args.name,
        "symbol": args.symbol,
        "initialMintTo": args.initial_mint_to.to_hex(),
        "initialMintAmount": args.initial_mint_amount.to_string(),
        "freeMintSupply": args.free_mint_supply.to_string(),
        "freeMintPerTx": args.free_mint_per_tx.to_string(),
        "freeMintUserCap": args.free_mint_user_cap.to_string(),
        "tokenOwner": args.token_owner.to_hex(),
        "burnEnabled": args.burn_enabled,
    })
}

fn cmd_calldata(opts: &ParsedArgs) -> Result<Value, String> {
    let params = opts.form().validate().map_err(|e| e.to_string())?;
    let init = params.token_init(opts.recipient()?);
    let calldata = init.encode().map_err(|e| e.to_string())?;
    debug!("Encoded {} byte constructor payload", calldata.len());
    Ok(json!({
        "hex": hex::encode(&calldata),
        "length": calldata.len(),
        "headerLength": token::FIXED_HEADER_LEN,
        "fields": token_init_json(&init),
    }))
}

fn cmd_factory_calldata(opts: &ParsedArgs) -> Result<Value, String> {
    let params = opts.form().validate().map_err(|e| e.to_string())?;
    let args = params.factory_args(opts.recipient()?);
    let calldata = args.encode().map_err(|e| e.to_string())?;
    Ok(json!({
        "hex": hex::encode(&calldata),
        "length": calldata.len(),
        "selector": format!("{:#010x}", selector(DEPLOY_TOKEN_SIGNATURE)),
        "fields": factory_args_json(&args),
    }))
}

fn cmd_decode(opts: &ParsedArgs) -> Result<Value, String> {
    let raw = opts.target.as_deref().ok_or("Usage: tokenlaunch decode <hex>")?;
    let bytes = hex::decode(raw.trim_start_matches("0x")).map_err(|e| format!("Invalid hex: {}", e))?;

    if let Ok(args) = DeployTokenArgs::decode(&bytes) {
        return Ok(json!({"kind": "deployToken", "fields": factory_args_json(&args)}));
    }
    if let Ok(call) = TokenCall::decode(&bytes) {
        return Ok(match call {
            TokenCall::Mint { to, amount } => {
                json!({"kind": "mint", "to": to.to_hex(), "amount": amount.to_string()})
            }
            TokenCall::Burn { amount } => json!({"kind": "burn", "amount": amount.to_string()}),
        });
    }
    let init = TokenInit::decode(&bytes).map_err(|e| format!("Not a recognised payload: {}", e))?;
    Ok(json!({"kind": "constructor", "fields": token_init_json(&init)}))
}

fn cmd_preview(opts: &ParsedArgs) -> Result<Value, String> {
    let preview = TokenPreview::from_form(&opts.form());
    serde_json::to_value(preview).map_err(|e| e.to_string())
}

fn cmd_estimate(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.config();
    let estimate =
        CostEstimate::new(opts.network()?, opts.mintable, opts.pausable, config.platform_fee_sats, config.max_spend_sats);
    let lines: serde_json::Map<String, Value> =
        estimate.lines().into_iter().map(|(label, value)| (label.to_string(), Value::String(value))).collect();
    Ok(json!({
        "estimate": estimate,
        "total": estimate.total_display(),
        "breakdown": lines,
    }))
}

fn cmd_networks() -> Result<Value, String> {
    let networks: Vec<Value> = Network::ALL
        .iter()
        .map(|n| {
            json!({
                "name": n.as_str(),
                "rpc": n.rpc_url(),
                "symbol": n.symbol(),
                "prefix": n.address_prefix(),
                "badge": n.badge(),
            })
        })
        .collect();
    Ok(json!(networks))
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to create runtime: {}", e))
}

fn cmd_lookup(opts: &ParsedArgs) -> Result<Value, String> {
    let address = opts.target.as_deref().ok_or("Usage: tokenlaunch lookup <bitcoin-address>")?;
    let network = opts.network()?;
    let config = opts.config();
    let provider = JsonRpcConnector.connect(network, &config.rpc_url_for(network)).map_err(|e| e.to_string())?;

    let resolved = runtime()?
        .block_on(provider.get_public_key_info(address))
        .map_err(|e| e.to_string())?;
    Ok(match resolved {
        Some(key) => json!({
            "address": address,
            "found": true,
            "hex": key.to_hex(),
            "p2op": key.p2op(network).map_err(|e| e.to_string())?,
        }),
        None => json!({"address": address, "found": false}),
    })
}

fn cmd_simulate(opts: &ParsedArgs) -> Result<Value, String> {
    let network = opts.network()?;
    let config = opts.config();
    let factory = config.factory.clone().ok_or("--factory <address> is required (env: TOKENLAUNCH_FACTORY)")?;
    let sender = opts.recipient()?;
    let params = opts.form().validate().map_err(|e| e.to_string())?;
    let calldata = params.factory_args(sender).encode().map_err(|e| e.to_string())?;
    let provider = JsonRpcConnector.connect(network, &config.rpc_url_for(network)).map_err(|e| e.to_string())?;

    let call = ContractCall { to: factory, calldata, from: Some(sender) };
    let simulation = runtime()?.block_on(provider.simulate(&call)).map_err(|e| e.to_string())?;
    let token_address = simulation.token_deployed().and_then(|e| e.token_address.p2op(network).ok());
    Ok(json!({
        "revert": simulation.revert,
        "estimatedGas": simulation.estimated_gas,
        "events": simulation.events.iter().map(|e| e.event_type.clone()).collect::<Vec<_>>(),
        "tokenAddress": token_address,
    }))
}

fn cmd_artifact(opts: &ParsedArgs) -> Result<Value, String> {
    let config = opts.config();
    let location = match opts.target.as_deref() {
        Some(target) => ArtifactLocation::parse(target),
        None => config.default_artifact.clone().ok_or("No artifact given (env: TOKENLAUNCH_ARTIFACT)")?,
    };
    let bytecode = runtime()?.block_on(location.load()).map_err(|e| e.to_string())?;
    Ok(json!({
        "bytes": bytecode.len(),
        "size": format!("{} bytes", group_thousands(&bytecode.len().to_string())),
        "sha256": hex::encode(Sha256::digest(bytecode.as_bytes())),
    }))
}
