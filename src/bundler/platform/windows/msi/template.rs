//! Built-in WiX project template.

pub const WXS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Wix xmlns="http://schemas.microsoft.com/wix/2006/wi">
  <Product Id="{{product_guid}}"
           Name="{{application_name}}"
           Language="1033"
           Version="{{version}}"
           Manufacturer="{{vendor}}"
           UpgradeCode="{{upgrade_guid}}">
    <Package Description="{{description}}"
             Comments="None"
             InstallerVersion="200"
             Compressed="yes"
             InstallScope="{{install_scope}}"/>
    <Media Id="1" Cabinet="application.cab" EmbedCab="yes"/>
{{wix36_markup}}
    <Directory Id="TARGETDIR" Name="SourceDir">
      <Directory Id="{{program_files_id}}">
        <Directory Id="APPLICATIONFOLDER" Name="{{fs_name}}"/>
      </Directory>
      <Directory Id="ProgramMenuFolder">
        <Directory Id="ProgramMenuDir" Name="{{application_name}}">
          <Component Id="CleanupMainApplicationFolder" Guid="{{cleanup_guid}}">
            <RemoveFolder Id="RemoveProgramMenuDir" On="uninstall"/>
            <RegistryValue Root="HKCU"
                           Key="{{vendor_registry_key}}"
                           Type="string"
                           Value=""
                           KeyPath="yes"/>
          </Component>
        </Directory>
      </Directory>
      <Directory Id="DesktopFolder"/>
    </Directory>
    <?include bundle.wxi ?>
  </Product>
</Wix>
"#;

/// Markup only accepted by WiX 3.6 and later.
pub const WIX36_MARKUP: &str = r#"    <MajorUpgrade AllowSameVersionUpgrades="yes"
                  DowngradeErrorMessage="A newer version of this application is already installed."/>"#;
