#[cfg(test)]
mod tests {
    use crate::args::*;
    use crate::cmdlet::*;
    use crate::config::*;
    use crate::error::*;
    use crate::exec::*;
    use crate::grains::*;
    use crate::servicing::*;
    use serde_json::json;

    // ─── ArgValue Tests ──────────────────────────────────────

    #[test]
    fn test_arg_from_json_scalars() {
        assert_eq!(ArgValue::from_json(json!(true)).unwrap(), ArgValue::Bool(true));
        assert_eq!(ArgValue::from_json(json!(5)).unwrap(), ArgValue::Int(5));
        assert_eq!(ArgValue::from_json(json!("Foo")).unwrap(), ArgValue::Str("Foo".to_string()));
    }

    #[test]
    fn test_arg_from_json_float_is_other() {
        let value = ArgValue::from_json(json!(1.5)).unwrap();
        assert_eq!(value, ArgValue::Other(json!(1.5)));
    }

    #[test]
    fn test_arg_from_json_credential() {
        let value = ArgValue::from_json(json!({"username": "bob", "password": "secret"})).unwrap();
        assert_eq!(value, ArgValue::Credential(Credential::new("bob", "secret")));
    }

    #[test]
    fn test_arg_from_json_credential_without_password_is_rejected() {
        let err = ArgValue::from_json(json!({"username": "bob"})).unwrap_err();
        assert!(matches!(err, ExtError::InvalidArgument(_)));
        assert!(err.to_string().contains("bob"));
    }

    #[test]
    fn test_arg_from_json_plain_map_is_other() {
        let value = ArgValue::from_json(json!({"realm": "corp"})).unwrap();
        assert_eq!(value, ArgValue::Other(json!({"realm": "corp"})));
    }

    #[test]
    fn test_credential_debug_redacts_password() {
        let debug = format!("{:?}", Credential::new("bob", "secret"));
        assert!(debug.contains("bob"));
        assert!(!debug.contains("secret"));
    }

    // ─── InvocationArgs Tests ────────────────────────────────

    #[test]
    fn test_args_preserve_insertion_order() {
        let args = InvocationArgs::new()
            .with("zeta", 1)
            .with("alpha", "a")
            .with("mid", true);
        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_args_set_replaces_in_place() {
        let mut args = InvocationArgs::new().with("a", 1).with("b", 2);
        args.set("a", "x");
        assert_eq!(args.len(), 2);
        assert_eq!(args.get_str("a"), Some("x"));
        assert_eq!(args.iter().next().unwrap().0, "a");
    }

    #[test]
    fn test_args_string_list() {
        let args = InvocationArgs::new()
            .with("sources", ArgValue::from_json(json!(["d:\\sources\\sxs", "e:\\sxs"])).unwrap())
            .with("one", "c:\\sxs")
            .with("bad", ArgValue::from_json(json!([1])).unwrap());
        assert_eq!(args.get_string_list("sources").unwrap().len(), 2);
        assert_eq!(args.get_string_list("one").unwrap(), vec!["c:\\sxs".to_string()]);
        assert!(args.get_string_list("missing").unwrap().is_empty());
        assert!(args.get_string_list("bad").is_err());
    }

    // ─── Cmdlet Tests ────────────────────────────────────────

    #[test]
    fn test_normalize_cmdlet_name() {
        assert_eq!(normalize_cmdlet_name("Set-AdfsProperties"), "set_adfsproperties");
        assert_eq!(normalize_cmdlet_name("Get-Adfs-Relying-Party"), "get_adfs_relying_party");
        assert_eq!(normalize_cmdlet_name("plain"), "plain");
    }

    #[test]
    fn test_cmdlet_descriptor_deserialize() {
        let d: CmdletDescriptor =
            serde_json::from_value(json!({"Name": "Get-AdfsProperties", "Synopsis": "Gets properties."}))
                .unwrap();
        assert_eq!(d.name, "Get-AdfsProperties");
        assert_eq!(d.synopsis, "Gets properties.");
        assert_eq!(d.function_name(), "get_adfsproperties");
    }

    #[test]
    fn test_cmdlet_descriptor_null_synopsis() {
        let d: CmdletDescriptor =
            serde_json::from_value(json!({"Name": "Get-AdfsClient", "Synopsis": null})).unwrap();
        assert_eq!(d.synopsis, "");
        let d: CmdletDescriptor = serde_json::from_value(json!({"Name": "Get-AdfsClient"})).unwrap();
        assert_eq!(d.synopsis, "");
    }

    // ─── Grains Tests ────────────────────────────────────────

    #[test]
    fn test_grains_release_allow_list() {
        let grains = Grains::new()
            .with(OS_FAMILY, "Windows")
            .with(OS_RELEASE, "2012ServerR2");
        assert!(grains.is_windows());
        assert!(grains.release_in(ADFS_RELEASES));
        assert!(!grains.release_in(SNAPIN_RELEASES));
    }

    #[test]
    fn test_grains_missing_release() {
        let grains = Grains::new().with(OS_FAMILY, "Windows");
        assert!(!grains.release_in(ADFS_RELEASES));
    }

    #[test]
    fn test_grains_os_version_major() {
        assert_eq!(Grains::new().with(OS_VERSION, "6.3.9600").os_version_major(), Some(6));
        assert_eq!(Grains::new().with(OS_VERSION, "10.0.17763").os_version_major(), Some(10));
        assert_eq!(Grains::new().with(OS_VERSION, "junk").os_version_major(), None);
        assert_eq!(Grains::new().os_version_major(), None);
    }

    #[test]
    fn test_grains_merge_overrides() {
        let mut grains = Grains::new().with(OS_RELEASE, "2012ServerR2").with(KERNEL, "Windows");
        grains.merge(Grains::new().with(OS_RELEASE, "2012ServerR2Core"));
        assert_eq!(grains.os_release(), Some("2012ServerR2Core"));
        assert_eq!(grains.kernel(), Some("Windows"));
    }

    #[test]
    fn test_grains_serialize_transparent() {
        let grains = Grains::new().with(OS_FAMILY, "Windows");
        assert_eq!(serde_json::to_value(&grains).unwrap(), json!({"os_family": "Windows"}));
    }

    // ─── RunOptions Tests ────────────────────────────────────

    #[test]
    fn test_run_options_presets() {
        let ps = RunOptions::powershell();
        assert!(ps.is_powershell());
        assert!(ps.use_shell);
        assert!(!ps.ignore_retcode);

        let dism = RunOptions::ignore_retcode();
        assert!(!dism.is_powershell());
        assert!(dism.ignore_retcode);
    }

    // ─── Servicing Types Tests ───────────────────────────────

    #[test]
    fn test_package_info_field_names() {
        let info = PackageInfo {
            state: "Installed".to_string(),
            release_type: "Foundation".to_string(),
            install_time: "11/21/2014 2:02 AM".to_string(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["Release Type"], "Foundation");
        assert_eq!(value["Install Time"], "11/21/2014 2:02 AM");
    }

    #[test]
    fn test_feature_states() {
        assert!(FeatureInfo { state: STATE_ENABLED.to_string() }.is_enabled());
        assert!(FeatureInfo { state: STATE_ENABLE_PENDING.to_string() }.is_enable_pending());
        assert!(!FeatureInfo { state: "Disabled".to_string() }.is_enabled());
    }

    #[test]
    fn test_enable_report_defaults() {
        let report = EnableFeatureReport::new("TelnetClient");
        assert!(report.result);
        assert!(!report.pending);
        assert!(report.changes.is_empty());
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_default() {
        let config = ExtConfig::default();
        assert_eq!(config.log_filter, "info");
        assert!(config.shell.powershell_exe.ends_with("powershell.exe"));
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = ExtConfig::from_json(r#"{"log_filter": "debug"}"#).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.shell, ShellConfig::default());
    }

    #[test]
    fn test_config_invalid_json() {
        let err = ExtConfig::from_json("{{").unwrap_err();
        assert!(matches!(err, ExtError::Config(_)));
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = ExtError::UnknownFunction {
            module: "identityserver_sts".to_string(),
            function: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown function: identityserver_sts.nope");
    }

    #[test]
    fn test_error_from_serde() {
        let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ExtError = e.into();
        assert!(matches!(err, ExtError::Serialization(_)));
    }
}
